//! Normalization of raw `nvidia-smi` CSV fields into metric names and values.

use crate::reading::SampleValue;
use tracing::debug;

pub const BYTES_PER_MIB: f64 = 1_048_576.0;

const MIB_SUFFIX: &str = "MiB";

fn is_separator(c: char) -> bool {
    matches!(c, '.' | ' ' | '[' | ']' | '%')
}

/// Turn a CSV header field into a metric name.
///
/// Separators (`.`, space, `[`, `]`, `%`) become `_`, runs of `_` collapse
/// into one, a trailing `_` is dropped and the result is lowercased. Unit
/// text inside brackets survives, so `memory.total [MiB]` becomes
/// `memory_total_mib`.
pub fn sanitize_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());

    for c in raw.trim().chars() {
        let c = if is_separator(c) { '_' } else { c };
        if c == '_' && label.ends_with('_') {
            continue;
        }
        label.push(c);
    }

    if label.ends_with('_') {
        label.pop();
    }

    label.to_lowercase()
}

/// Turn a CSV value field into a typed sample.
///
/// Percentages become fractions, `MiB` quantities become bytes, plain digit
/// runs become integers and dotted decimals become floats. Anything else is
/// passed through as trimmed text.
pub fn sanitize_value(raw: &str) -> SampleValue {
    let trimmed = raw.trim();

    if let Some((amount, _)) = raw.split_once('%') {
        if let Some(v) = parse_amount(amount) {
            return SampleValue::Float(v / 100.0);
        }
    } else if let Some((amount, _)) = raw.split_once(MIB_SUFFIX) {
        if let Some(v) = parse_amount(amount) {
            return SampleValue::Float(v * BYTES_PER_MIB);
        }
    } else if is_integer(trimmed) {
        // digit runs too long for i64 still carry a usable magnitude
        return match trimmed.parse::<i64>() {
            Ok(v) => SampleValue::Integer(v),
            Err(_) => trimmed
                .parse::<f64>()
                .map(SampleValue::Float)
                .unwrap_or_else(|_| SampleValue::Text(trimmed.to_string())),
        };
    } else if trimmed.contains('.') {
        if let Ok(v) = trimmed.parse::<f64>() {
            return SampleValue::Float(v);
        }
    }

    debug!(value = trimmed, "No sanitization done");
    SampleValue::Text(trimmed.to_string())
}

/// Number in front of a unit. A bare unit (`" %"`) reads as zero.
fn parse_amount(amount: &str) -> Option<f64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Some(0.0);
    }
    amount.parse().ok()
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_replaces_separators() {
        assert_eq!(sanitize_label("utilization.gpu [%]"), "utilization_gpu");
        assert_eq!(sanitize_label("pci.bus_id"), "pci_bus_id");
        assert_eq!(sanitize_label(" pcie.link.gen.max"), "pcie_link_gen_max");
    }

    #[test]
    fn test_label_keeps_unit_text() {
        assert_eq!(sanitize_label("memory.total [MiB]"), "memory_total_mib");
        assert_eq!(sanitize_label(" memory.free [MiB]"), "memory_free_mib");
    }

    #[test]
    fn test_label_edge_cases() {
        assert_eq!(sanitize_label(""), "");
        assert_eq!(sanitize_label("  [%]  "), "");
        assert_eq!(sanitize_label("a..b"), "a_b");
        assert_eq!(sanitize_label("Driver_Version"), "driver_version");
    }

    #[test]
    fn test_label_is_idempotent() {
        let inputs = [
            "utilization.gpu [%]",
            "memory.used [MiB]",
            "timestamp",
            "__a__",
            "x [ ]",
            "  .%. ",
        ];
        for raw in inputs {
            let once = sanitize_label(raw);
            assert_eq!(sanitize_label(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_value_percent_becomes_fraction() {
        assert_eq!(sanitize_value("45 %"), SampleValue::Float(0.45));
        assert_eq!(sanitize_value(" 30 %"), SampleValue::Float(0.3));
    }

    #[test]
    fn test_value_mib_becomes_bytes() {
        assert_eq!(
            sanitize_value("8192 MiB"),
            SampleValue::Float(8192.0 * 1_048_576.0)
        );
        assert_eq!(sanitize_value(" 0 MiB"), SampleValue::Float(0.0));
    }

    #[test]
    fn test_value_bare_unit_is_zero() {
        assert_eq!(sanitize_value(" %"), SampleValue::Float(0.0));
        assert_eq!(sanitize_value(" MiB"), SampleValue::Float(0.0));
    }

    #[test]
    fn test_value_numbers() {
        assert_eq!(sanitize_value("12"), SampleValue::Integer(12));
        assert_eq!(sanitize_value(" 65 "), SampleValue::Integer(65));
        assert_eq!(sanitize_value("12.5"), SampleValue::Float(12.5));
        assert_eq!(sanitize_value(" 535.104.05"), SampleValue::Text("535.104.05".into()));
    }

    #[test]
    fn test_value_text_passthrough() {
        assert_eq!(sanitize_value(" P0 "), SampleValue::Text("P0".into()));
        assert_eq!(
            sanitize_value(" NVIDIA GeForce RTX 3090"),
            SampleValue::Text("NVIDIA GeForce RTX 3090".into())
        );
        assert_eq!(
            sanitize_value("2024/01/31 10:11:12.345"),
            SampleValue::Text("2024/01/31 10:11:12.345".into())
        );
        assert_eq!(sanitize_value("[N/A] %"), SampleValue::Text("[N/A] %".into()));
        assert_eq!(sanitize_value(""), SampleValue::Text(String::new()));
    }
}
