// This binary crate is intentionally minimal.
// All algebra and network logic lives in the library (src/lib.rs and its
// modules). Run the demo with:
//   cargo run --bin activity
fn main() {
    println!("magnetite-nn: rank-checked linear algebra and a backpropagation network.");
    println!("Run `cargo run --bin activity` to see the weekly-activity demo.");
}
