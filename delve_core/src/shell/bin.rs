// Binary entry point for delve
// This is a thin wrapper that delegates to the library implementation

fn main() {
    match delve_core::shell::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("delve fatal error: {:#}", e);
            std::process::exit(2);
        }
    }
}
