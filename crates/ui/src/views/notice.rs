use dioxus::prelude::*;
use services::Notice;

#[component]
pub fn NoticeBanner(notice: Notice) -> Element {
    let class = if notice.is_destructive() {
        "notice notice-destructive"
    } else {
        "notice notice-info"
    };

    rsx! {
        div { class, role: "status",
            strong { class: "notice-title", "{notice.title}" }
            p { class: "notice-description", "{notice.description}" }
        }
    }
}
