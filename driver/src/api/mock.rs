use crate::fixture::stock::FixtureSet;
use anyhow::Context;
use log::info;
use rxlogcore::dataset::SourceRecord;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::reply::{self, Json, WithStatus};
use warp::{http::StatusCode, Filter};

pub fn mock_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

type FixtureStore = Arc<RwLock<FixtureSet>>;

/// Stand-in for the stock API, serving fixture records per dataset.
pub struct MockApi {
    addr: SocketAddr,
    fixtures: FixtureStore,
}

impl MockApi {
    /// Binds `addr` (port 0 picks a free port) on a background thread.
    pub fn spawn(addr: SocketAddr, fixtures: FixtureSet) -> anyhow::Result<Self> {
        let fixtures = Arc::new(RwLock::new(fixtures));
        let state_for_filter = fixtures.clone();
        let store = warp::any().map(move || state_for_filter.clone());

        let get_route = warp::path!("datasets" / String)
            .and(warp::get())
            .and(store.clone())
            .map(get_dataset);
        let post_route = warp::path!("datasets" / String)
            .and(warp::post())
            .and(warp::body::json())
            .and(store)
            .map(post_dataset);

        let (bound_tx, bound_rx) = mpsc::channel::<anyhow::Result<SocketAddr>>();
        thread::spawn(move || {
            let routes = get_route.or(post_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .context("building mock API runtime");
            let runtime = match runtime {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = bound_tx.send(Err(err));
                    return;
                }
            };
            runtime.block_on(async move {
                let bound = warp::serve(routes)
                    .try_bind_ephemeral(addr)
                    .with_context(|| format!("binding mock API on {}", addr));
                match bound {
                    Ok((bound, server)) => {
                        let _ = bound_tx.send(Ok(bound));
                        server.await;
                    }
                    Err(err) => {
                        let _ = bound_tx.send(Err(err));
                    }
                }
            });
        });

        let addr = bound_rx
            .recv()
            .context("mock API thread exited before binding")??;
        info!("[mock] serving fixtures on {}", addr);
        Ok(Self { addr, fixtures })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[cfg(test)]
    pub fn remove(&self, name: &str) {
        if let Ok(mut guard) = self.fixtures.write() {
            guard.remove(name);
        }
    }
}

fn get_dataset(name: String, state: FixtureStore) -> WithStatus<Json> {
    match lookup(&state, &name) {
        Some(records) => reply::with_status(reply::json(&records), StatusCode::OK),
        None => {
            let body = json!({ "error": format!("unknown dataset {}", name) });
            reply::with_status(reply::json(&body), StatusCode::NOT_FOUND)
        }
    }
}

fn post_dataset(name: String, batch: Vec<SourceRecord>, state: FixtureStore) -> WithStatus<Json> {
    let count = batch.len();
    match state.write() {
        Ok(mut guard) => {
            guard.insert(name.clone(), batch);
            info!("[mock] dataset {} replaced with {} records", name, count);
            let body = json!({ "status": "ok", "records": count });
            reply::with_status(reply::json(&body), StatusCode::OK)
        }
        Err(_) => {
            let body = json!({ "error": "fixture store poisoned" });
            reply::with_status(reply::json(&body), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn lookup(state: &RwLock<FixtureSet>, name: &str) -> Option<Vec<SourceRecord>> {
    state
        .read()
        .ok()
        .and_then(|fixtures| fixtures.records(name).map(<[SourceRecord]>::to_vec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiClient;
    use crate::fixture::stock::FixtureConfig;
    use std::time::Duration;

    fn ephemeral() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn client_fetches_fixture_records() {
        let fixtures = FixtureSet::generate(&FixtureConfig::default(), ["Estoque"]);
        let expected = fixtures.records("Estoque").unwrap().to_vec();
        let mock = MockApi::spawn(ephemeral(), fixtures).unwrap();

        let timeout = Duration::from_secs(2);
        let token = Some("token".to_string());
        let client = ApiClient::new(&mock.base_url(), token, timeout).unwrap();
        let records = client.fetch_records("/datasets/Estoque").await.unwrap();
        assert_eq!(records, expected);

        let err = client.fetch_records("/datasets/Vendas").await.unwrap_err();
        assert!(format!("{err:#}").contains("unexpected status"));
    }

    #[tokio::test]
    async fn posted_records_replace_fixture() {
        let mock = MockApi::spawn(ephemeral(), FixtureSet::default()).unwrap();
        let body = vec![SourceRecord::new("Insulina", 3.0)];
        let response = reqwest::Client::new()
            .post(format!("{}/datasets/MenorEstoque", mock.base_url()))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let timeout = Duration::from_secs(2);
        let client = ApiClient::new(&mock.base_url(), None, timeout).unwrap();
        let endpoint = "/datasets/MenorEstoque";
        assert_eq!(client.fetch_records(endpoint).await.unwrap(), body);

        mock.remove("MenorEstoque");
        assert!(client.fetch_records(endpoint).await.is_err());
    }
}
