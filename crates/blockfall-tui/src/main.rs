mod app;
mod input;
mod view;
mod widgets;

fn main() -> anyhow::Result<()> {
    app::run()
}
