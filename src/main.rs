fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
    if let Err(err) = pie_labels::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
