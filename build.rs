use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=dashboard");

    if !Path::new("dashboard/index.html").exists() {
        println!("cargo:warning=dashboard/index.html not found, the binary will serve a placeholder page");
    }
}
