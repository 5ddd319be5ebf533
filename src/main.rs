use tracing_subscriber::EnvFilter;

#[cfg(any(feature = "desktop", feature = "mobile"))]
mod app {
    use dioxus::prelude::*;
    use streamshelf::components::AppShell;

    const APP_CSS: Asset = asset!("/assets/styling/app.css");

    #[component]
    pub fn App() -> Element {
        rsx! {
            document::Meta { name: "theme-color", content: "#a38449" }
            document::Title { "StreamShelf" }
            document::Stylesheet { href: APP_CSS }

            AppShell {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streamshelf=info")),
        )
        .init();

    #[cfg(any(feature = "desktop", feature = "mobile"))]
    dioxus::launch(app::App);

    #[cfg(not(any(feature = "desktop", feature = "mobile")))]
    tracing::error!("built without a platform; enable the `desktop` or `mobile` feature");
}
