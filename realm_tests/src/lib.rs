//! Test support: a minimal scripted server side of the wire protocol.

use anyhow::Context;
use realm_shared::wire::{decode_frame, encode_frame, Message};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Reads one full frame and decodes it.
pub async fn read_frame<R: AsyncRead + Unpin>(r: &mut R) -> anyhow::Result<Message> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf).await.context("read frame length")?;
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    r.read_exact(&mut body).await.context("read frame body")?;
    decode_frame(&body)
}

/// Encodes and writes one frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(w: &mut W, msg: &Message) -> anyhow::Result<()> {
    let frame = encode_frame(msg)?;
    w.write_all(&frame).await.context("write frame")?;
    Ok(())
}

/// Writes a length-prefixed body verbatim, bypassing the encoder; used to
/// inject malformed frames.
pub async fn write_raw_body<W: AsyncWrite + Unpin>(w: &mut W, body: &[u8]) -> anyhow::Result<()> {
    w.write_all(&(body.len() as u32).to_be_bytes())
        .await
        .context("write raw length")?;
    w.write_all(body).await.context("write raw body")?;
    Ok(())
}
