//! Kanban board of issues, kept in local storage and mirrored to the
//! remote record store on demand. Editing is paused while a load or save is
//! in flight.

use crate::api::HttpRecordStore;
use crate::components::{ErrorMessage, LoadingSpinner};
use crate::identity::IdentityQuery;
use crate::state::{use_scoped, LocalStore, UseScoped};
use crate::teardown::{use_teardown, Teardown};
use crate::Route;
use dioxus::prelude::*;
use tracing::{debug, info};
use worksite_core::sync::{load_board, save_board};
use worksite_core::{AppConfig, Board, BoardSource, Identity, Issue, IssueStatus, UserScope};

#[component]
pub fn IssueBoard(identity: IdentityQuery) -> Element {
    match identity.0 {
        Some(identity) => rsx! { BoardView { identity } },
        None => rsx! {
            main { class: "min-h-screen bg-gray-50 py-8",
                div { class: "max-w-2xl mx-auto px-6",
                    ErrorMessage { message: "Missing user details. Please authenticate again.".to_string() }
                }
            }
        },
    }
}

fn refresh(
    teardown: &Teardown,
    remote: HttpRecordStore,
    scope: UserScope,
    mut board: UseScoped<Board>,
    mut syncing: Signal<bool>,
    mut notice: Signal<Option<String>>,
) {
    syncing.set(true);
    teardown.spawn("load_board", async move {
        let loaded = load_board(&remote, &LocalStore, &scope).await;
        let message = match loaded.source {
            BoardSource::Remote => "Board loaded from the server.",
            BoardSource::Local => "Showing the board saved on this device.",
        };
        board.set(loaded.board);
        notice.set(Some(message.to_string()));
        syncing.set(false);
    });
}

#[component]
fn BoardView(identity: Identity) -> Element {
    let scope = identity.scope();
    let mut board = use_scoped::<Board>(scope.clone());
    let syncing = use_signal(|| true);
    let mut notice = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let teardown = use_teardown();
    let config = use_context::<AppConfig>();
    let remote = use_hook(move || HttpRecordStore::new(&config.endpoints));

    // Runs once: `refresh` only writes signals.
    use_effect({
        let (teardown, remote, scope) = (teardown.clone(), remote.clone(), scope.clone());
        move || refresh(&teardown, remote.clone(), scope.clone(), board, syncing, notice)
    });

    let handle_refresh = {
        let (teardown, remote, scope) = (teardown.clone(), remote.clone(), scope.clone());
        move |_| {
            error.set(None);
            refresh(&teardown, remote.clone(), scope.clone(), board, syncing, notice);
        }
    };

    let handle_save = {
        let mut syncing = syncing;
        move |_| {
            syncing.set(true);
            error.set(None);
            let (remote, scope, snapshot) = (remote.clone(), scope.clone(), board.get());
            teardown.spawn("save_board", async move {
                match save_board(&remote, &LocalStore, &scope, &snapshot).await {
                    Ok(()) => {
                        info!(issues = snapshot.issues().len(), "Board saved");
                        notice.set(Some("Board saved.".to_string()));
                    }
                    Err(e) => error.set(Some(e.user_message())),
                }
                syncing.set(false);
            });
        }
    };

    let current = board.get();
    let columns: Vec<(IssueStatus, usize, Vec<Issue>)> = IssueStatus::ALL
        .into_iter()
        .map(|status| {
            let issues: Vec<Issue> = current.issues_in(status).cloned().collect();
            (status, issues.len(), issues)
        })
        .collect();

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-8",
            div { class: "max-w-6xl mx-auto px-6 space-y-6",
                div { class: "flex justify-between items-center",
                    h1 { class: "text-3xl font-bold text-gray-900", "{identity}'s Board" }
                    div { class: "flex items-center space-x-3",
                        Link {
                            class: "text-blue-600 hover:underline",
                            to: Route::Tasks { identity: identity.clone().into() },
                            "Back to tasks"
                        }
                        button {
                            class: "border border-gray-300 text-gray-700 px-4 py-2 rounded hover:bg-gray-100 disabled:opacity-50",
                            disabled: syncing(),
                            onclick: handle_refresh,
                            "Refresh"
                        }
                        button {
                            class: "bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700 disabled:opacity-50",
                            disabled: syncing(),
                            onclick: handle_save,
                            "Save"
                        }
                    }
                }

                if let Some(message) = error() {
                    ErrorMessage { message }
                } else if let Some(message) = notice() {
                    p { class: "text-sm text-gray-600", "{message}" }
                }

                if syncing() {
                    LoadingSpinner { message: "Syncing board...".to_string() }
                }

                NewIssueForm {
                    disabled: syncing(),
                    on_create: move |draft: IssueDraft| {
                        let mut created = None;
                        board.update(|b| {
                            created = b.add_issue(&draft.title, &draft.description, draft.assignee.as_deref());
                        });
                        if let Some(id) = created {
                            debug!(%id, "Created issue");
                        }
                    }
                }

                div { class: "grid grid-cols-1 md:grid-cols-3 gap-4",
                    for (status, count, issues) in columns {
                        div { key: "{status}", class: "bg-gray-100 rounded-lg p-4 space-y-3",
                            h2 { class: "text-sm font-semibold text-gray-600 tracking-wide",
                                "{status} ({count})"
                            }
                            for issue in issues {
                                IssueCard {
                                    key: "{issue.id}",
                                    disabled: syncing(),
                                    comments: current.comments().for_issue(&issue.id).to_vec(),
                                    issue: issue.clone(),
                                    on_move: {
                                        let id = issue.id.clone();
                                        move |to: IssueStatus| board.update(|b| {
                                            b.move_issue(&id, to);
                                        })
                                    },
                                    on_delete: {
                                        let id = issue.id.clone();
                                        move |_| board.update(|b| {
                                            b.delete_issue(&id);
                                        })
                                    },
                                    on_comment: {
                                        let id = issue.id.clone();
                                        move |text: String| board.update(|b| {
                                            b.add_comment(&id, &text);
                                        })
                                    },
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct IssueDraft {
    title: String,
    description: String,
    assignee: Option<String>,
}

#[component]
fn NewIssueForm(disabled: bool, on_create: EventHandler<IssueDraft>) -> Element {
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut assignee = use_signal(String::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if disabled || title().trim().is_empty() {
            return;
        }
        let who = assignee().trim().to_string();
        on_create.call(IssueDraft {
            title: title(),
            description: description(),
            assignee: (!who.is_empty()).then_some(who),
        });
        title.set(String::new());
        description.set(String::new());
        assignee.set(String::new());
    };

    let input_class = "px-3 py-2 border border-gray-300 rounded focus:ring-2 focus:ring-blue-500 focus:border-transparent";

    rsx! {
        form { class: "bg-white rounded-lg shadow p-4 grid grid-cols-1 md:grid-cols-4 gap-3", onsubmit: handle_submit,
            input { class: input_class, placeholder: "Title", value: "{title}", oninput: move |evt| title.set(evt.value()) }
            input { class: input_class, placeholder: "Description", value: "{description}", oninput: move |evt| description.set(evt.value()) }
            input { class: input_class, placeholder: "Assignee (optional)", value: "{assignee}", oninput: move |evt| assignee.set(evt.value()) }
            button {
                r#type: "submit",
                class: "bg-green-600 text-white px-4 py-2 rounded hover:bg-green-700 disabled:opacity-50",
                disabled,
                "Create Issue"
            }
        }
    }
}

#[component]
fn IssueCard(
    issue: Issue,
    disabled: bool,
    comments: Vec<String>,
    on_move: EventHandler<IssueStatus>,
    on_delete: EventHandler<()>,
    on_comment: EventHandler<String>,
) -> Element {
    let mut comment = use_signal(String::new);

    let handle_comment = move |evt: FormEvent| {
        evt.prevent_default();
        let text = comment();
        if !disabled && !text.trim().is_empty() {
            on_comment.call(text);
            comment.set(String::new());
        }
    };

    rsx! {
        div { class: "bg-white rounded-lg shadow p-3 space-y-2",
            div { class: "flex justify-between items-start",
                div {
                    span { class: "text-xs text-gray-500", "{issue.id}" }
                    h3 { class: "font-semibold text-gray-900", "{issue.title}" }
                }
                button {
                    class: "text-red-600 hover:text-red-800 text-xs disabled:opacity-50",
                    disabled,
                    onclick: move |_| on_delete.call(()),
                    "Delete"
                }
            }
            if !issue.description.is_empty() {
                p { class: "text-sm text-gray-700", "{issue.description}" }
            }
            if let Some(assignee) = &issue.assignee {
                p { class: "text-xs text-gray-500", "Assignee: {assignee}" }
            }
            div { class: "flex space-x-2",
                for status in IssueStatus::ALL.into_iter().filter(|s| *s != issue.status) {
                    button {
                        key: "{status}",
                        class: "text-xs border border-gray-300 rounded px-2 py-1 hover:bg-gray-100 disabled:opacity-50",
                        disabled,
                        onclick: move |_| on_move.call(status),
                        "→ {status}"
                    }
                }
            }
            if !comments.is_empty() {
                ul { class: "text-sm text-gray-600 list-disc list-inside",
                    for (index, text) in comments.iter().enumerate() {
                        li { key: "{index}", "{text}" }
                    }
                }
            }
            form { class: "flex space-x-2", onsubmit: handle_comment,
                input {
                    class: "flex-1 px-2 py-1 border border-gray-300 rounded text-sm",
                    placeholder: "Add a comment",
                    value: "{comment}",
                    oninput: move |evt| comment.set(evt.value()),
                }
                button { r#type: "submit", class: "text-sm text-blue-600 hover:underline disabled:opacity-50", disabled, "Comment" }
            }
        }
    }
}
