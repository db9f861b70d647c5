//! Network actor - runs API requests in the Tokio async runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{ApiCommand, ApiResponse};
use crate::network::auth::SessionTokenProvider;
use crate::network::client::{create_client, ApiClient};

/// Network actor that processes API commands sequentially spawned onto a JoinSet
pub struct NetworkActor {
    client: Arc<ApiClient>,
    session: Arc<SessionTokenProvider>,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    in_flight: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<ApiResponse>, base_url: &str) -> Self {
        let http = create_client();
        let session = Arc::new(SessionTokenProvider::new(http.clone(), base_url));
        let client = Arc::new(ApiClient::new(http, base_url, session.clone()));
        NetworkActor {
            client,
            session,
            response_tx,
            in_flight: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ApiCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ApiCommand::SignIn { id, session_key }) => {
                            self.session.set_session_key(session_key);
                            let client = self.client.clone();
                            let session = self.session.clone();
                            let tx = self.response_tx.clone();
                            self.in_flight.spawn(async move {
                                tracing::info!(id, "Validating session key");
                                let response = match client.fetch_profile().await {
                                    Ok(profile) => ApiResponse::SignedIn { id, profile },
                                    Err(e) => {
                                        // A bad key must not poison later attempts
                                        session.clear_session_key();
                                        ApiResponse::Error { id, message: e.to_string() }
                                    }
                                };
                                let _ = tx.send(response);
                            });
                        }

                        Some(ApiCommand::FetchConnections { id }) => {
                            let client = self.client.clone();
                            let tx = self.response_tx.clone();
                            self.in_flight.spawn(async move {
                                let response = match client.fetch_connections().await {
                                    Ok(lists) => ApiResponse::Connections { id, lists },
                                    Err(e) => ApiResponse::Error { id, message: e.to_string() },
                                };
                                let _ = tx.send(response);
                            });
                        }

                        Some(ApiCommand::FetchStories { id }) => {
                            let client = self.client.clone();
                            let tx = self.response_tx.clone();
                            self.in_flight.spawn(async move {
                                let response = match client.fetch_stories().await {
                                    Ok(stories) => ApiResponse::Stories { id, stories },
                                    Err(e) => ApiResponse::Error { id, message: e.to_string() },
                                };
                                let _ = tx.send(response);
                            });
                        }

                        Some(ApiCommand::Discover { id, input }) => {
                            let client = self.client.clone();
                            let tx = self.response_tx.clone();
                            self.in_flight.spawn(async move {
                                tracing::info!(id, input = %input, "Searching people");
                                let response = match client.discover(&input).await {
                                    Ok(users) => ApiResponse::DiscoverResults { id, users },
                                    Err(e) => ApiResponse::Error { id, message: e.to_string() },
                                };
                                let _ = tx.send(response);
                            });
                        }

                        Some(ApiCommand::Follow { id, user_id }) => {
                            self.spawn_action(id, move |client| async move {
                                client.follow(&user_id).await
                            });
                        }

                        Some(ApiCommand::Unfollow { id, user_id }) => {
                            self.spawn_action(id, move |client| async move {
                                client.unfollow(&user_id).await
                            });
                        }

                        Some(ApiCommand::AcceptConnection { id, user_id }) => {
                            self.spawn_action(id, move |client| async move {
                                client.accept_connection(&user_id).await
                            });
                        }

                        Some(ApiCommand::CreateStory { id, submission }) => {
                            let client = self.client.clone();
                            let tx = self.response_tx.clone();
                            self.in_flight.spawn(async move {
                                tracing::info!(
                                    id,
                                    media_type = submission.media_type.as_str(),
                                    "Uploading story"
                                );
                                let response = match client.create_story(&submission).await {
                                    Ok(message) => ApiResponse::StoryCreated { id, message },
                                    Err(e) => ApiResponse::Error { id, message: e.to_string() },
                                };
                                let _ = tx.send(response);
                            });
                        }

                        Some(ApiCommand::Shutdown) => {
                            self.in_flight.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.in_flight.join_next() => {}
            }
        }
    }

    /// Spawn a follow/unfollow/accept call, answered with ActionDone
    fn spawn_action<F, Fut>(&mut self, id: u64, call: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<String, crate::network::client::ApiError>>
            + Send
            + 'static,
    {
        let client = self.client.clone();
        let tx = self.response_tx.clone();
        self.in_flight.spawn(async move {
            let response = match call(client).await {
                Ok(message) => ApiResponse::ActionDone { id, message },
                Err(e) => ApiResponse::Error { id, message: e.to_string() },
            };
            let _ = tx.send(response);
        });
    }
}
