//! Supported GPU instance SKUs
//!
//! The instance-type check only recognizes a fixed allow-list of Azure GPU
//! SKUs. Keeping them as an enum means an unknown label value is a distinct
//! outcome from a recognized SKU that simply never appeared on any node.

/// Azure GPU VM SKUs supported for GPU workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuSku {
    Nc24adsA100V4,
    Nd96asrV4,
    Nd96amsrA100V4,
    Nd96isrH100V5,
    Nd96isrH200V5,
}

impl GpuSku {
    /// All supported SKUs, in allow-list order. Ties in [`SkuCounts::most_common`]
    /// resolve to the earlier entry.
    pub const ALL: [GpuSku; 5] = [
        GpuSku::Nc24adsA100V4,
        GpuSku::Nd96asrV4,
        GpuSku::Nd96amsrA100V4,
        GpuSku::Nd96isrH100V5,
        GpuSku::Nd96isrH200V5,
    ];

    /// The SKU name as it appears in the instance-type node label.
    pub fn as_str(&self) -> &'static str {
        match self {
            GpuSku::Nc24adsA100V4 => "Standard_NC24ads_A100_v4",
            GpuSku::Nd96asrV4 => "Standard_ND96asr_v4",
            GpuSku::Nd96amsrA100V4 => "Standard_ND96amsr_A100_v4",
            GpuSku::Nd96isrH100V5 => "Standard_ND96isr_H100_v5",
            GpuSku::Nd96isrH200V5 => "Standard_ND96isr_H200_v5",
        }
    }

    /// Parse an instance-type label value. Returns `None` for anything
    /// outside the allow-list; callers decide whether to skip or report.
    pub fn parse(value: &str) -> Option<GpuSku> {
        GpuSku::ALL.iter().copied().find(|sku| sku.as_str() == value)
    }

    fn index(self) -> usize {
        match self {
            GpuSku::Nc24adsA100V4 => 0,
            GpuSku::Nd96asrV4 => 1,
            GpuSku::Nd96amsrA100V4 => 2,
            GpuSku::Nd96isrH100V5 => 3,
            GpuSku::Nd96isrH200V5 => 4,
        }
    }
}

impl std::fmt::Display for GpuSku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-SKU node counts for one instance-type scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuCounts([usize; GpuSku::ALL.len()]);

impl SkuCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, sku: GpuSku) {
        self.0[sku.index()] += 1;
    }

    pub fn get(&self, sku: GpuSku) -> usize {
        self.0[sku.index()]
    }

    /// The SKU with the highest count, or `None` when every count is zero.
    /// Ties resolve to the SKU listed first in [`GpuSku::ALL`].
    pub fn most_common(&self) -> Option<(GpuSku, usize)> {
        let mut best: Option<(GpuSku, usize)> = None;
        for sku in GpuSku::ALL {
            let count = self.get(sku);
            if best.is_none_or(|(_, n)| count > n) {
                best = Some((sku, count));
            }
        }
        best.filter(|&(_, n)| n > 0)
    }

    /// Counts per SKU in allow-list order, for debug logging.
    pub fn entries(&self) -> impl Iterator<Item = (GpuSku, usize)> + '_ {
        GpuSku::ALL.iter().map(|&sku| (sku, self.get(sku)))
    }
}
