fn main() {
    if let Err(err) = cardflow::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
