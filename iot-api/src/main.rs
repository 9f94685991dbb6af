fn main() {
    if let Err(err) = iot_dashboard_api::app::run() {
        eprintln!("api startup failed: {err}");
        std::process::exit(1);
    }
}
