//! Types shared between the XDP kernel program and the userspace capture
//! loader.
//!
//! `no_std` so it compiles for both targets:
//! - `bpfel-unknown-none` (the kernel-side XDP program, `wireprint-capture-xdp`)
//! - the host target (userspace loader, `wireprint-capture`)
//!
//! Enable the `aya` feature in the userspace crate to get the `aya::Pod`
//! impl required for reading values back out of the BPF map.
#![no_std]

/// Quirk bitmask constants extracted from IP and TCP headers, set by the
/// XDP program and decoded by the analyzer as additional anomaly signals.
pub mod quirk_bits {
    pub const DF: u32 = 1 << 0;
    pub const NONZERO_ID: u32 = 1 << 1;
    pub const ZERO_ID: u32 = 1 << 2;
    pub const MUST_BE_ZERO: u32 = 1 << 3;
    pub const ECN: u32 = 1 << 4;
    pub const SEQ_ZERO: u32 = 1 << 5;
    pub const ACK_NONZERO: u32 = 1 << 6;
    pub const NONZERO_URG: u32 = 1 << 7;
    pub const URG: u32 = 1 << 8;
    pub const PUSH: u32 = 1 << 9;
}

/// Raw fields captured from a TCP SYN packet by the XDP program.
///
/// Layout must match the kernel-side struct in `wireprint-capture-xdp`
/// exactly (both `#[repr(C)]`):
///
/// ```text
/// offset  0: src_addr  u32  (network byte order)
/// offset  4: src_port  u16  (network byte order)
/// offset  6: window    u16  (network byte order)
/// offset  8: optlen    u16  (TCP options length captured)
/// offset 10: ip_ttl    u8
/// offset 11: ip_olen   u8   (IP options length: ihl*4 - 20)
/// offset 12: options   [u8; 40]
/// offset 52: quirks    u32  (quirk_bits bitmask)
/// offset 56: tick      u64  (global SYN counter at capture time)
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SynRawData {
    pub src_addr: u32,
    pub src_port: u16,
    pub window: u16,
    pub optlen: u16,
    pub ip_ttl: u8,
    pub ip_olen: u8,
    pub options: [u8; 40],
    pub quirks: u32,
    pub tick: u64,
}

impl Default for SynRawData {
    fn default() -> Self {
        Self {
            src_addr: 0,
            src_port: 0,
            window: 0,
            optlen: 0,
            ip_ttl: 0,
            ip_olen: 0,
            options: [0u8; 40],
            quirks: 0,
            tick: 0,
        }
    }
}

/// Lets the userspace loader read `SynRawData` straight out of the BPF map.
/// Only compiled for the `aya` feature (i.e. in the userspace crate).
///
/// SAFETY: `SynRawData` is `#[repr(C)]`, `Copy`, fully initialized with no
/// implicit padding.
#[cfg(feature = "aya")]
#[allow(unsafe_code)]
unsafe impl aya::Pod for SynRawData {}
