/*
 * Copyright 2024 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Reads the local descriptor document and follows changes to it.

use std::path::{Path, PathBuf};

use notify::Watcher;
use tracing::Instrument;

use crate::k8s;

/// How far into a document to look for the opening brace of a JSON object.
const SNIFF_LEN: usize = 4096;

/// Parses a `GameServer` document. A document whose first non-whitespace
/// byte is `{` is read as JSON, anything else as YAML.
pub fn parse(buf: &[u8]) -> crate::Result<k8s::GameServer> {
    let is_json = buf
        .iter()
        .take(SNIFF_LEN)
        .find(|byte| !byte.is_ascii_whitespace())
        .is_some_and(|byte| *byte == b'{');

    Ok(if is_json {
        serde_json::from_slice(buf)?
    } else {
        serde_yaml::from_slice(buf)?
    })
}

pub async fn read(path: &Path) -> crate::Result<k8s::GameServer> {
    tracing::info!(path = %path.display(), "reading gameserver configuration");
    let buf = tokio::fs::read(path).await?;
    parse(&buf)
}

/// Calls `on_change` with the re-read document after every write to `path`.
/// Documents that fail to parse are logged and skipped.
pub async fn watch(
    path: PathBuf,
    mut on_change: impl FnMut(k8s::GameServer) + Send,
) -> crate::Result<()> {
    let span = tracing::info_span!("local_file", path = %path.display());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let mut watcher = notify::RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        Default::default(),
    )?;
    watcher.watch(&path, notify::RecursiveMode::NonRecursive)?;
    tracing::info!(parent: &span, "watching file");

    while let Some(event) = rx.recv().instrument(span.clone()).await.transpose()? {
        tracing::trace!(parent: &span, event = ?event.kind, "new file event");

        if !matches!(
            event.kind,
            notify::EventKind::Modify(notify::event::ModifyKind::Data(_))
        ) {
            continue;
        }

        // Reading straight after the event can observe a partial write.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        tracing::info!(parent: &span, "file has been changed");
        match read(&path).await {
            Ok(game_server) => on_change(game_server),
            Err(error) => {
                tracing::error!(parent: &span, %error, "error setting gameserver from file")
            }
        }
    }

    Err(eyre::eyre!("filesystem watch unexpectedly stopped"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const YAML: &str = "
apiVersion: agones.dev/v1
kind: GameServer
metadata:
  name: from-yaml
spec:
  sdkServer:
    logLevel: Debug
";

    #[test]
    fn sniffs_format() {
        let gs = parse(YAML.as_bytes()).unwrap();
        assert_eq!(gs.metadata.name.as_deref(), Some("from-yaml"));
        assert_eq!(gs.spec.sdk_server.log_level, k8s::SdkServerLogLevel::Debug);

        let json = br#"
            {"metadata": {"name": "from-json"}, "status": {"state": "Ready"}}
        "#;
        let gs = parse(json).unwrap();
        assert_eq!(gs.metadata.name.as_deref(), Some("from-json"));
        assert_eq!(gs.state(), Some(k8s::GameServerState::Ready));

        assert!(parse(b"{ not json").is_err());
    }

    #[tokio::test]
    async fn follows_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gameserver.yaml");
        tokio::fs::write(&path, YAML).await.unwrap();

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let handle = tokio::spawn(watch(path.clone(), {
            let seen = seen.clone();
            move |gs: k8s::GameServer| seen.lock().push(gs.metadata.name.unwrap_or_default())
        }));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        tokio::fs::write(&path, YAML.replace("from-yaml", "changed"))
            .await
            .unwrap();

        for _ in 0..50 {
            if seen.lock().iter().any(|name| name == "changed") {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }

        assert!(seen.lock().iter().any(|name| name == "changed"));
        handle.abort();
    }
}
