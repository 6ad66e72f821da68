// src/digitization/systems/probe.rs

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use chrono::Local;

use crate::digitization::{
    events::{ConnectivityProbeFinished, RequestConnectivityProbe},
    resources::{ApiConfig, ConnectivityState, ConnectivityStatus},
};

pub fn request_probe_on_startup(mut writer: EventWriter<RequestConnectivityProbe>) {
    writer.write(RequestConnectivityProbe);
}

pub fn handle_probe_request(
    mut events: EventReader<RequestConnectivityProbe>,
    mut connectivity: ResMut<ConnectivityState>,
    config: Res<ApiConfig>,
    runtime: Res<TokioTasksRuntime>,
) {
    if events.read().last().is_none() {
        return;
    }

    connectivity.status = ConnectivityStatus::Checking;
    let config = config.clone();
    runtime.spawn_background_task(move |mut ctx| async move {
        let result = match config.client() {
            Ok(client) => client.probe().await,
            Err(err) => Err(err),
        };
        let base_url = config.base_url;
        ctx.run_on_main_thread(move |ctx| {
            ctx.world.send_event(ConnectivityProbeFinished { base_url, result });
        })
        .await;
    });
}

pub fn apply_probe_results(
    mut events: EventReader<ConnectivityProbeFinished>,
    mut connectivity: ResMut<ConnectivityState>,
    config: Res<ApiConfig>,
) {
    for event in events.read() {
        // A probe of a URL that was changed meanwhile says nothing about the current one.
        if event.base_url != config.base_url {
            continue;
        }
        connectivity.status = match &event.result {
            Ok(code) => {
                info!("OCR service at {} reachable (HTTP {})", event.base_url, code);
                ConnectivityStatus::Online(*code)
            }
            Err(err) => {
                warn!("OCR service at {} unreachable: {}", event.base_url, err);
                ConnectivityStatus::Offline(err.to_string())
            }
        };
        connectivity.checked_url = Some(event.base_url.clone());
        connectivity.checked_at = Some(Local::now());
    }
}
