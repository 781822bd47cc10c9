use dioxus::prelude::*;
use dioxus_router::Router;
use services::AuthContext;

use crate::context::provide_auth_state;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    provide_auth_state(AuthContext::Anonymous);

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Typus" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Algo deu errado" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
