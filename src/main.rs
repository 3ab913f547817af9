fn main() {
    if let Err(err) = price_finder::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
