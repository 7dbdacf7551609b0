fn main() {
    if let Err(err) = routeart_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
