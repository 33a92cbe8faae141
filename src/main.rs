fn main() {
    if let Err(err) = cesizen_lib::run() {
        eprintln!("Erreur : {err:#}");
        std::process::exit(1);
    }
}
