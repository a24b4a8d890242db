/// Static description of an exported gauge. `key` is the sanitized
/// `nvidia-smi` column the gauge reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeSpec {
    pub key: &'static str,
    pub help: &'static str,
}

pub const GPU_GAUGES: [GaugeSpec; 6] = [
    GaugeSpec {
        key: "temperature_gpu",
        help: "Temperature of the GPU in Celsius",
    },
    GaugeSpec {
        key: "utilization_gpu",
        help: "GPU Utilization in percent (%)",
    },
    GaugeSpec {
        key: "utilization_memory",
        help: "GPU Memory Utilization in percent (%)",
    },
    GaugeSpec {
        key: "memory_total_mib",
        help: "GPU Total Memory in bytes",
    },
    GaugeSpec {
        key: "memory_used_mib",
        help: "GPU Used Memory in bytes",
    },
    GaugeSpec {
        key: "memory_free_mib",
        help: "GPU Free Memory in bytes",
    },
];
