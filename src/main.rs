fn main() {
    if let Err(e) = scrive::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
