use std::io::{Read, Write};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{errors::SessionError, messages::Packet};

/// Read exactly one packet. Packets have no length prefix; the reader
/// already knows which packet comes next and how wide it is.
pub fn read_packet<T: Packet, R: Read>(reader: &mut R) -> Result<T, SessionError> {
    let mut buf = vec![0; T::LEN];
    reader.read_exact(&mut buf)?;
    Ok(T::decode(&buf)?)
}

pub fn write_packet<T: Packet, W: Write>(writer: &mut W, packet: &T) -> Result<(), SessionError> {
    writer.write_all(&packet.encode()?)?;
    writer.flush()?;
    Ok(())
}

pub async fn read_packet_async<T, R>(reader: &mut R) -> Result<T, SessionError>
where
    T: Packet,
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0; T::LEN];
    reader.read_exact(&mut buf).await?;
    Ok(T::decode(&buf)?)
}

pub async fn write_packet_async<T, W>(writer: &mut W, packet: &T) -> Result<(), SessionError>
where
    T: Packet,
    W: AsyncWrite + Unpin,
{
    writer.write_all(&packet.encode()?).await?;
    writer.flush().await?;
    Ok(())
}
