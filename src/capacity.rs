//! Storage and RAM budgeting for the microcontrollers that end up holding
//! these rasters. Pure arithmetic over fixed board figures, no probing.

use crate::bitmap::PackedBitmap;

const MIB: usize = 1024 * 1024;

// flash carved out before any image data
const BOOTLOADER: usize = 32 * 1024;
const PARTITION_TABLE: usize = 4 * 1024;
const NVS: usize = 20 * 1024;
const OTA_DATA: usize = 8 * 1024;
const FIRMWARE: usize = MIB;
const FS_OVERHEAD_PER_MIB: usize = 16 * 1024;

// RAM carved out before any image processing
const RUNTIME_HEAP: usize = 100 * 1024;
const STACK: usize = 32 * 1024;
const SCRATCH: usize = 10_000;

pub struct DeviceProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub flash_sizes: &'static [usize],
    pub sram: usize,
    pub psram: usize,
}

pub const DEVICE_PROFILES: &[DeviceProfile] = &[
    DeviceProfile {
        name: "ESP32-WROOM-32 (DevKit V1)",
        description: "standard ESP32 on most dev boards",
        flash_sizes: &[4 * MIB, 8 * MIB, 16 * MIB],
        sram: 520 * 1024,
        psram: 0,
    },
    DeviceProfile {
        name: "ESP32-C3-Mini",
        description: "smaller, more power-efficient ESP32-C3",
        flash_sizes: &[4 * MIB],
        sram: 400 * 1024,
        psram: 0,
    },
    DeviceProfile {
        name: "ESP32-S3 (PSRAM)",
        description: "high-end ESP32 with external PSRAM",
        flash_sizes: &[8 * MIB, 16 * MIB, 32 * MIB],
        sram: 512 * 1024,
        psram: 8 * MIB,
    },
];

pub struct StorageBudget {
    pub flash_total: usize,
    pub overhead: usize,
    pub partition: usize,
    pub usable: usize,
    pub max_images: usize,
    pub leftover: usize,
}

/// How many packed rasters of `image_len` bytes fit on a flash chip once
/// the fixed system partitions and a 10% filesystem reserve are gone.
pub fn storage_budget(flash_total: usize, image_len: usize) -> StorageBudget {
    let overhead = BOOTLOADER
        + PARTITION_TABLE
        + NVS
        + OTA_DATA
        + FIRMWARE
        + FS_OVERHEAD_PER_MIB * (flash_total / MIB);
    let partition = flash_total.saturating_sub(overhead);
    let usable = partition * 9 / 10;

    StorageBudget {
        flash_total,
        overhead,
        partition,
        usable,
        max_images: usable / image_len,
        leftover: usable % image_len,
    }
}

pub struct RuntimeBudget {
    pub sram_total: usize,
    pub psram_total: usize,
    pub available_sram: usize,
    /// Packed raster + two 1-bpp display planes + scratch.
    pub per_image: usize,
    pub fits_in_sram: bool,
    pub simultaneous_sram: usize,
    pub simultaneous_psram: usize,
}

/// Whether decoding and replaying one raster to a panel fits in RAM.
pub fn runtime_budget(profile: &DeviceProfile, width: usize, height: usize) -> RuntimeBudget {
    let plane_len = width * height / 8;
    let per_image = PackedBitmap::packed_len(width, height) + 2 * plane_len + SCRATCH;
    let available_sram = profile.sram.saturating_sub(RUNTIME_HEAP + STACK);

    RuntimeBudget {
        sram_total: profile.sram,
        psram_total: profile.psram,
        available_sram,
        per_image,
        fits_in_sram: available_sram >= per_image,
        simultaneous_sram: available_sram / per_image,
        simultaneous_psram: profile.psram / per_image,
    }
}

pub fn format_bytes(n: usize) -> String {
    let mut value = n as f64;
    for unit in ["B", "KB", "MB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} GB")
}
