// Streaming multipart uploader
// A producer task pushes the file's bytes into a bounded channel that the multipart
// part consumes as its body stream; the producer's result comes back on a oneshot.
use futures::Stream;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use ssm_env_core::port::CrashReportError;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncReadExt;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Bytes read from the file per body chunk
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks buffered between the producer and the request
pub const PIPE_CAPACITY: usize = 8;

const DUMP_MIME: &str = "application/octet-stream";

type Chunk = io::Result<Vec<u8>>;

/// Multipart/form-data uploader for a single file field
#[derive(Debug, Clone, Default)]
pub struct MultipartUploader {
    client: reqwest::Client,
}

impl MultipartUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST `path` to `url` as the form field `field_name`
    ///
    /// # Returns
    /// The response body when the collector answers 202 Accepted
    ///
    /// # Errors
    /// - CrashReportError::UnexpectedStatus for any other status
    /// - CrashReportError::Io if the file cannot be opened or read
    /// - CrashReportError::Upload if the request fails
    pub async fn send_file(
        &self,
        field_name: &str,
        path: &Path,
        url: &str,
    ) -> Result<String, CrashReportError> {
        let (chunk_tx, chunk_rx) = mpsc::channel::<Chunk>(PIPE_CAPACITY);
        let (result_tx, result_rx) = oneshot::channel();

        tokio::spawn(produce(chunk_tx, result_tx, path.to_path_buf()));

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let part = Part::stream(reqwest::Body::wrap_stream(ChunkStream(chunk_rx)))
            .file_name(file_name)
            .mime_str(DUMP_MIME)
            .map_err(|e| CrashReportError::Upload(e.to_string()))?;
        let form = Form::new().part(field_name.to_string(), part);

        let sent = self.client.post(url).multipart(form).send().await;

        let written = result_rx
            .await
            .unwrap_or_else(|_| Err(io::Error::other("dump reader stopped")));

        // A failed file read is the root cause even when it also aborted the request
        let response = match (sent, written) {
            (_, Err(e)) if e.kind() != io::ErrorKind::BrokenPipe => {
                return Err(CrashReportError::Io(e))
            }
            (Err(e), _) => return Err(CrashReportError::Upload(e.to_string())),
            (Ok(_), Err(e)) => return Err(CrashReportError::Io(e)),
            (Ok(response), Ok(())) => response,
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CrashReportError::Upload(e.to_string()))?;

        debug!(status = %status, "Collector responded");

        if status != StatusCode::ACCEPTED {
            return Err(CrashReportError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Pump the file into the pipe, then report how it went
async fn produce(tx: mpsc::Sender<Chunk>, result: oneshot::Sender<io::Result<()>>, path: PathBuf) {
    let pumped = pump_file(&tx, &path).await;
    if let Err(e) = &pumped {
        // Fail the body stream so the request does not complete with a truncated file
        let _ = tx.send(Err(io::Error::new(e.kind(), e.to_string()))).await;
    }
    let _ = result.send(pumped);
}

async fn pump_file(tx: &mpsc::Sender<Chunk>, path: &Path) -> io::Result<()> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        tx.send(Ok(buf[..n].to_vec()))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "upload request closed"))?;
    }
}

/// Receiving half of the pipe as a body stream
struct ChunkStream(mpsc::Receiver<Chunk>);

impl Stream for ChunkStream {
    type Item = Chunk;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.0.poll_recv(cx)
    }
}
