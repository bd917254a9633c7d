use const_format::formatc;

shadow_rs::shadow!(build);

const LICENSE_1: &str = "scanlog-firmware Copyright (C) 2026 scanlog contributors";
const LICENSE_2: &str = "License GNU GPL-3.0 <https://gnu.org/licenses/gpl.html>";
const LICENSE_3: &str = "This is free software: you are free to change and redistribute it.";
const LICENSE_4: &str = "There is ABSOLUTELY NO WARRANTY, to the extent permitted by law.";

const VERSION: &str = formatc!("{}: {} [{}]", build::PROJECT_NAME, build::PKG_VERSION, build::RUST_VERSION);
const BUILD_DATE: &str = formatc!("Date: {}", build::BUILD_TIME);
const BUILD_SOURCE: &str = formatc!("Built from {}, on branch: {}", build::COMMIT_HASH, build::BRANCH);

/// Banner logged when the scanner comes up.
pub const WELCOME: &str = "barcode scanner log output";

/// Logs license and version info.
pub fn log_verinfo() {
    defmt::info!("{=str}", WELCOME);
    defmt::info!("{=str}", LICENSE_1);
    defmt::info!("{=str}", LICENSE_2);
    defmt::info!("{=str}", LICENSE_3);
    defmt::warn!("{=str}", LICENSE_4);
    defmt::info!("{=str}", VERSION);
    defmt::info!("{=str}", BUILD_DATE);
    defmt::info!("{=str}", BUILD_SOURCE);
}
