#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::Router;
use tracker_core::retrieval::{RetrievalSettings, Retriever};

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fixture server");
    });
    addr
}

/// Retriever writing under `root`, with share links rewritten onto `addr`.
pub fn retriever(root: &Path, addr: SocketAddr) -> Retriever {
    Retriever::new(RetrievalSettings {
        catalog_dir: root.join("csv"),
        media_dir: root.join("songs"),
        api_base: format!("http://{addr}/api/download"),
        yt_dlp: root.join("no-yt-dlp"),
        wait_interval: Duration::from_millis(10),
        wait_attempts: 5,
    })
    .expect("client should initialize")
}

/// A silent 16-bit mono PCM WAV file of `frames` frames.
pub fn wav_bytes(sample_rate: u32, frames: u32) -> Vec<u8> {
    let data_len = frames * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    bytes
}
