fn main() {
    if let Err(err) = dtok::run() {
        eprintln!("{}", dtok::format_error(&err));
        std::process::exit(1);
    }
}
