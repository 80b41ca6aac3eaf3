use crate::components::ErrorMessage;
use crate::identity::IdentityQuery;
use crate::state::use_scoped;
use crate::Route;
use dioxus::prelude::*;
use tracing::debug;
use worksite_core::{Identity, TodoList};

/// Task list for a verified user; the user comes from the query string.
#[component]
pub fn Tasks(identity: IdentityQuery) -> Element {
    match identity.0 {
        Some(identity) => rsx! { TaskList { identity } },
        None => rsx! {
            main { class: "min-h-screen bg-gray-50 py-8",
                div { class: "max-w-2xl mx-auto px-6",
                    ErrorMessage { message: "Missing user details. Please authenticate again.".to_string() }
                }
            }
        },
    }
}

#[component]
fn TaskList(identity: Identity) -> Element {
    let mut todos = use_scoped::<TodoList>(identity.scope());
    let mut new_task = use_signal(String::new);

    let handle_add = move |evt: FormEvent| {
        evt.prevent_default();
        let task = new_task();
        let mut added = None;
        todos.update(|list| added = list.add(&task));
        if let Some(id) = added {
            debug!(%id, "Added task");
            new_task.set(String::new());
        }
    };

    let list = todos.get();
    let done = list.items().iter().filter(|item| item.completed).count();
    let total = list.len();

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-8",
            div { class: "max-w-2xl mx-auto px-6 space-y-6",
                div { class: "flex justify-between items-center",
                    h1 { class: "text-3xl font-bold text-gray-900", "{identity}'s Tasks" }
                    Link {
                        class: "text-blue-600 hover:underline",
                        to: Route::IssueBoard { identity: identity.clone().into() },
                        "Open issue board"
                    }
                }
                p { class: "text-gray-600", "{done} of {total} completed" }

                form { class: "flex space-x-3", onsubmit: handle_add,
                    input {
                        r#type: "text",
                        placeholder: "Add a task",
                        value: "{new_task}",
                        oninput: move |evt| new_task.set(evt.value()),
                        class: "flex-1 px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-blue-500 focus:border-transparent",
                    }
                    button {
                        r#type: "submit",
                        class: "bg-blue-600 text-white px-4 py-2 rounded-lg hover:bg-blue-700 transition-colors",
                        "Add"
                    }
                }

                ul { class: "bg-white rounded-lg shadow divide-y",
                    for item in list.items().iter().cloned() {
                        li { key: "{item.id}", class: "flex items-center justify-between px-4 py-3",
                            label { class: "flex items-center space-x-3",
                                input {
                                    r#type: "checkbox",
                                    checked: item.completed,
                                    onchange: {
                                        let id = item.id.clone();
                                        move |_| todos.update(|list| {
                                            list.toggle(&id);
                                        })
                                    },
                                }
                                span {
                                    class: if item.completed { "line-through text-gray-400" } else { "text-gray-800" },
                                    "{item.task}"
                                }
                            }
                            button {
                                class: "text-red-600 hover:text-red-800 text-sm",
                                onclick: {
                                    let id = item.id.clone();
                                    move |_| todos.update(|list| {
                                        list.delete(&id);
                                    })
                                },
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}
