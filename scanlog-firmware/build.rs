fn main() {
    // esp-hal linker script, pulls in the memory layout of the chip
    println!("cargo:rustc-link-arg=-Tlinkall.x");
    // defmt section layout
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build information");
}
