//! Distributed Cluster
//!
//! Scatter/gather sorting across independent worker processes. The
//! coordinator connects to each worker over TCP, scatters one partition per
//! rank, and gathers one sorted run per rank back to itself. The merge
//! always happens on the coordinator (rank 0), which optionally sorts a
//! partition of its own while the workers run.
//!
//! Frames on the wire are a little-endian `u32` length followed by a
//! bincode-encoded message. A worker is addressed only by its connection;
//! there is no retry and no partial result: any broken connection fails the
//! whole dispatch, and a hung worker stalls the gather indefinitely.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dispatch::{sort_task, Dispatch};
use crate::error::{Result, SortError};

/// Largest accepted frame payload. Rejects corrupt length headers before
/// allocating.
const MAX_FRAME_BYTES: usize = 256 << 20;

/// Coordinator-to-worker messages.
#[derive(Serialize, Deserialize, Debug)]
pub enum Request {
    /// Sort the payload and answer with [`Reply::Sorted`].
    Sort(Vec<u64>),
    /// Timing fence: answer with [`Reply::Ready`] immediately.
    Sync,
    /// Close this connection.
    Shutdown,
}

/// Worker-to-coordinator messages.
#[derive(Serialize, Deserialize, Debug)]
pub enum Reply {
    Sorted(Vec<u64>),
    Ready,
}

fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<()> {
    let payload =
        bincode::serialize(message).map_err(|e| SortError::Protocol(e.to_string()))?;
    writer.write_all(&(payload.len() as u32).to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;
    let len = u32::from_le_bytes(header) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(SortError::Protocol(format!(
            "frame of {} bytes exceeds the {} byte limit",
            len, MAX_FRAME_BYTES
        )));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    bincode::deserialize(&payload).map_err(|e| SortError::Protocol(e.to_string()))
}

/// Worker main loop: accept coordinator connections and serve them one at a
/// time until the listener is closed.
pub fn serve(listener: TcpListener) -> Result<()> {
    info!(addr = %listener.local_addr()?, "worker listening");
    for connection in listener.incoming() {
        let mut stream = connection?;
        let peer = stream.peer_addr()?;
        info!(%peer, "coordinator connected");
        match handle_coordinator(&mut stream) {
            Ok(()) => info!(%peer, "coordinator disconnected"),
            Err(e) => warn!(%peer, error = %e, "connection failed"),
        }
    }
    Ok(())
}

fn handle_coordinator(stream: &mut TcpStream) -> Result<()> {
    loop {
        let request = match read_frame(stream) {
            Ok(request) => request,
            // Coordinator hung up between requests.
            Err(SortError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        };
        match request {
            Request::Sync => write_frame(stream, &Reply::Ready)?,
            Request::Sort(chunk) => {
                debug!(len = chunk.len(), "sorting chunk");
                write_frame(stream, &Reply::Sorted(sort_task(chunk)))?;
            }
            Request::Shutdown => return Ok(()),
        }
    }
}

/// Attach the failing rank to connection-level errors.
fn rank_error(rank: usize, err: SortError) -> SortError {
    match err {
        SortError::Io(source) => SortError::Worker { rank, source },
        other => other,
    }
}

/// Distributed mode: one TCP connection per worker rank.
///
/// Workers are ranked 1..=N in address order; the coordinator itself is
/// rank 0 and, when `participate` is set, keeps the first partition and
/// sorts it locally while the workers sort theirs.
pub struct ClusterDispatcher {
    workers: Vec<TcpStream>,
    participate: bool,
}

impl ClusterDispatcher {
    /// Connect to every worker endpoint. Fails if any worker is unreachable.
    pub fn connect<A: ToSocketAddrs>(addresses: &[A], participate: bool) -> Result<Self> {
        let mut workers = Vec::with_capacity(addresses.len());
        for address in addresses {
            let stream = TcpStream::connect(address)?;
            stream.set_nodelay(true)?;
            workers.push(stream);
        }
        info!(workers = workers.len(), participate, "cluster connected");
        Ok(Self {
            workers,
            participate,
        })
    }

    /// Synchronization fence: round-trip [`Request::Sync`] on every
    /// connection. Called before timing so connection setup and worker
    /// start-up never count against the measured run.
    pub fn barrier(&mut self) -> Result<()> {
        for (i, stream) in self.workers.iter_mut().enumerate() {
            write_frame(stream, &Request::Sync).map_err(|e| rank_error(i + 1, e))?;
        }
        for (i, stream) in self.workers.iter_mut().enumerate() {
            match read_frame(stream).map_err(|e| rank_error(i + 1, e))? {
                Reply::Ready => {}
                other => {
                    return Err(SortError::Protocol(format!(
                        "rank {} answered barrier with {:?}",
                        i + 1,
                        other
                    )))
                }
            }
        }
        Ok(())
    }

    /// Ask every worker to close its connection.
    pub fn shutdown(mut self) -> Result<()> {
        for stream in self.workers.iter_mut() {
            write_frame(stream, &Request::Shutdown)?;
        }
        Ok(())
    }
}

impl Dispatch for ClusterDispatcher {
    fn parallelism(&self) -> usize {
        self.workers.len() + usize::from(self.participate)
    }

    fn dispatch(&mut self, mut partitions: Vec<Vec<u64>>) -> Result<Vec<Vec<u64>>> {
        // Rank 0 keeps the first partition when it participates.
        let local = if self.participate && !partitions.is_empty() {
            Some(partitions.remove(0))
        } else {
            None
        };

        if partitions.len() > self.workers.len() {
            return Err(SortError::Protocol(format!(
                "{} partitions for {} worker connections",
                partitions.len(),
                self.workers.len()
            )));
        }

        // Scatter: every partition goes out before any reply is read.
        let sizes: Vec<usize> = partitions.iter().map(Vec::len).collect();
        let dispatched = partitions.len();
        for (i, partition) in partitions.into_iter().enumerate() {
            debug!(rank = i + 1, len = partition.len(), "scatter");
            write_frame(&mut self.workers[i], &Request::Sort(partition))
                .map_err(|e| rank_error(i + 1, e))?;
        }

        // The coordinator sorts its own chunk while the workers run.
        let local_run = local.map(sort_task);

        // Gather: block until every rank has returned its run, in rank
        // order. Completion order on the workers is irrelevant.
        let mut runs = Vec::with_capacity(dispatched + 1);
        runs.extend(local_run);
        for i in 0..dispatched {
            match read_frame(&mut self.workers[i]).map_err(|e| rank_error(i + 1, e))? {
                Reply::Sorted(run) => {
                    if run.len() != sizes[i] {
                        return Err(SortError::Protocol(format!(
                            "rank {} returned {} elements, expected {}",
                            i + 1,
                            run.len(),
                            sizes[i]
                        )));
                    }
                    debug!(rank = i + 1, len = run.len(), "gather");
                    runs.push(run);
                }
                other => {
                    return Err(SortError::Protocol(format!(
                        "rank {} answered dispatch with {:?}",
                        i + 1,
                        other
                    )))
                }
            }
        }

        Ok(runs)
    }
}
