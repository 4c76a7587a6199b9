fn main() {
    if let Err(err) = oecd_div::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
