//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Emberline");

    pollster::block_on(emberline_app::App::run());
}
