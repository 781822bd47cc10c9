use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{Notice, SignUp};

use crate::context::{AppContext, use_auth};
use crate::routes::Route;
use crate::views::NoticeBanner;

#[component]
pub fn AuthView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth = use_auth();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut full_name = use_signal(String::new);
    let mut signing_up = use_signal(|| false);
    let mut submitting = use_signal(|| false);
    let mut notice = use_signal(|| None::<Notice>);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let identity = ctx.identity();
        let email_value = email.read().clone();
        let password_value = password.read().clone();
        let name_value = full_name.read().trim().to_owned();

        spawn(async move {
            submitting.set(true);
            notice.set(None);
            if signing_up() {
                let request = SignUp {
                    email: email_value,
                    password: password_value,
                    full_name: name_value,
                };
                match identity.sign_up(request).await {
                    Ok(_) => {
                        notice.set(Some(Notice::info(
                            "Conta criada!",
                            "Faça login para começar.",
                        )));
                        password.set(String::new());
                        signing_up.set(false);
                    }
                    Err(err) => notice.set(Some(Notice::from_auth_error(&err))),
                }
            } else {
                match identity.sign_in(&email_value, &password_value).await {
                    Ok(session) => {
                        auth.set(session.into());
                        navigator.replace(Route::Dashboard {});
                    }
                    Err(err) => notice.set(Some(Notice::from_auth_error(&err))),
                }
            }
            submitting.set(false);
        });
    };

    let (heading, cta, toggle_label) = if signing_up() {
        ("Criar conta", "Cadastrar", "Já tem conta? Entrar")
    } else {
        ("Entrar", "Entrar", "Não tem conta? Cadastre-se")
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { class: "brand", "Typus" }
                h2 { "{heading}" }

                if let Some(current) = notice() {
                    NoticeBanner { notice: current }
                }

                form { class: "auth-form", onsubmit: submit,
                    if signing_up() {
                        label { "Nome completo"
                            input {
                                r#type: "text",
                                value: "{full_name}",
                                oninput: move |evt| full_name.set(evt.value()),
                            }
                        }
                    }
                    label { "Email"
                        input {
                            r#type: "email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                    }
                    label { "Senha"
                        input {
                            r#type: "password",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: submitting(),
                        "{cta}"
                    }
                }

                button {
                    class: "btn btn-link",
                    onclick: move |_| {
                        signing_up.toggle();
                        notice.set(None);
                    },
                    "{toggle_label}"
                }
            }
        }
    }
}
