//! Retrieves information about the version of the agent from Git and the build
//! environment. `shadow-rs` writes it to the output directory and it can be
//! accessed at runtime through the `build` module.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
