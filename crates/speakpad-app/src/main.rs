//! Main application entry point (native).

fn main() {
    env_logger::init();
    log::info!("Starting SpeakPad");

    pollster::block_on(speakpad_app::App::run());
}
