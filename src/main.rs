use showroom::config::AppConfig;
use showroom::ShowroomApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::load();
    let app = pollster::block_on(ShowroomApp::new(config));
    app.run()
}
