use std::process;

fn main() {
    if let Err(error) = tierforge::run() {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}
