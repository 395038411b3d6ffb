use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::outcome::TaskOutcome;

/// The engine's answer to one task frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Outcome(TaskOutcome),
    Error { message: String },
}

/// Write one value as a newline-terminated JSON frame and flush it.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut frame = serde_json::to_vec(value)?;
    frame.push(b'\n');
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read the next JSON frame, or `None` once the peer has closed the stream.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;
    if read == 0 {
        return Ok(None);
    }
    let value = serde_json::from_str(line.trim_end())?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::task::Task;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn frames_round_trip_over_a_duplex_pipe() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        let task = Task::DeletePrice { id: "V003".into() };

        write_frame(&mut tx, &task).await.unwrap();
        drop(tx);

        let mut reader = BufReader::new(rx);
        let first: Option<Task> = read_frame(&mut reader).await.unwrap();
        assert_eq!(first, Some(task));

        let second: Option<Task> = read_frame(&mut reader).await.unwrap();
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn garbage_frames_surface_as_codec_errors() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        tx.write_all(b"this is not json\n").await.unwrap();
        drop(tx);

        let mut reader = BufReader::new(rx);
        let err = read_frame::<_, Task>(&mut reader).await.unwrap_err();
        assert!(matches!(err, MarketError::CodecError(_)));
    }
}
