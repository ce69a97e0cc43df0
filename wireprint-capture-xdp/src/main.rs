//! XDP program for TCP SYN fingerprinting.
//!
//! Captures TCP SYN packets and stores raw handshake data in a BPF LRU hash map
//! keyed by `(src_ip, src_port)`. The map layout and global variable names
//! (`dst_ip`, `dst_port`) match what `wireprint-capture/src/probe.rs` expects.
#![no_std]
#![no_main]

use aya_ebpf::{
    macros::{map, xdp},
    maps::{Array, LruHashMap},
    programs::XdpContext,
};

use core::mem;

use wireprint_capture_common::{quirk_bits, SynRawData};

// ── Network protocol constants (network byte order on LE host) ──────────────

const ETH_P_IP: u16 = 0x0800_u16.swap_bytes();
const ETH_P_8021Q: u16 = 0x8100_u16.swap_bytes();
const ETH_P_8021AD: u16 = 0x88A8_u16.swap_bytes();

const IP_RF: u16 = 0x8000_u16.swap_bytes(); // reserved / must-be-zero
const IP_DF: u16 = 0x4000_u16.swap_bytes(); // don't fragment
const IP_MF: u16 = 0x2000_u16.swap_bytes(); // more fragments
const IP_OFFSET: u16 = 0x1FFF_u16.swap_bytes(); // fragment offset mask

const IPPROTO_TCP: u8 = 6;
const TCPOPT_MAXLEN: usize = 40;

// ── Globals patched at load time by EbpfLoader::set_global ──────────────────

#[no_mangle]
#[allow(non_upper_case_globals)]
static dst_port: u16 = 0;

#[no_mangle]
#[allow(non_upper_case_globals)]
static dst_ip: u32 = 0;

// ── Network header definitions ───────────────────────────────────────────────
//
// aya-ebpf-bindings does not include ethernet/IP/TCP headers (those are UAPI
// network headers, not BPF-specific). We define minimal versions here.

#[repr(C)]
struct EthHdr {
    h_dest: [u8; 6],
    h_source: [u8; 6],
    h_proto: u16, // network byte order
}

#[repr(C)]
struct VlanHdr {
    tci: u16,
    encapsulated_proto: u16, // network byte order
}

/// Minimal IPv4 header (no options).
/// The first byte encodes `ihl` (low nibble) and `version` (high nibble)
/// following `__LITTLE_ENDIAN_BITFIELD` ordering.
#[repr(C)]
struct IpHdr {
    version_ihl: u8,
    tos: u8,
    tot_len: u16,
    id: u16,
    frag_off: u16, // network byte order; contains DF/MF/offset flags
    ttl: u8,
    protocol: u8,
    check: u16,
    saddr: u32, // network byte order
    daddr: u32, // network byte order
}

impl IpHdr {
    #[inline(always)]
    fn ihl(&self) -> u8 {
        self.version_ihl & 0x0F
    }
}

/// Minimal TCP header (fixed 20 bytes).
/// Bytes 12-13 encode `doff` and the flag bits using `__LITTLE_ENDIAN_BITFIELD`.
#[repr(C)]
struct TcpHdr {
    source: u16,       // network byte order
    dest: u16,         // network byte order
    seq: u32,          // network byte order
    ack_seq: u32,      // network byte order
    offset_flags: u16, // doff + flags, LE layout described above
    window: u16,       // network byte order
    check: u16,
    urg_ptr: u16,
}

impl TcpHdr {
    #[inline(always)]
    fn doff(&self) -> u8 {
        ((self.offset_flags >> 4) & 0xF) as u8
    }
    #[inline(always)]
    fn syn(&self) -> bool {
        (self.offset_flags >> 9) & 1 != 0
    }
    #[inline(always)]
    fn ack(&self) -> bool {
        (self.offset_flags >> 12) & 1 != 0
    }
    #[inline(always)]
    fn urg(&self) -> bool {
        (self.offset_flags >> 13) & 1 != 0
    }
    #[inline(always)]
    fn psh(&self) -> bool {
        (self.offset_flags >> 11) & 1 != 0
    }
    #[inline(always)]
    fn ece(&self) -> bool {
        (self.offset_flags >> 14) & 1 != 0
    }
    #[inline(always)]
    fn cwr(&self) -> bool {
        (self.offset_flags >> 15) & 1 != 0
    }
}

// ── BPF maps ─────────────────────────────────────────────────────────────────

#[map]
#[allow(non_upper_case_globals)]
static tcp_syn_map: LruHashMap<u64, SynRawData> = LruHashMap::with_max_entries(8192, 0);

#[map]
#[allow(non_upper_case_globals)]
static syn_counter: Array<u64> = Array::with_max_entries(1, 0);

// ── Packet access helper ─────────────────────────────────────────────────────

/// Returns a const pointer to `T` at `offset` bytes from the start of the
/// packet, or `None` if the access would exceed `data_end`.
#[inline(always)]
unsafe fn ptr_at<T>(ctx: &XdpContext, offset: usize) -> Option<*const T> {
    let start = ctx.data();
    let end = ctx.data_end();
    let access_end = start.checked_add(offset)?.checked_add(mem::size_of::<T>())?;
    if access_end > end {
        return None;
    }
    Some(start.checked_add(offset)? as *const T)
}

// ── Entry point ──────────────────────────────────────────────────────────────

#[xdp]
pub fn wireprint_xdp_syn(ctx: XdpContext) -> u32 {
    match try_xdp_syn(&ctx) {
        Ok(()) => aya_ebpf::bindings::xdp_action::XDP_PASS,
        Err(()) => aya_ebpf::bindings::xdp_action::XDP_PASS,
    }
}

fn try_xdp_syn(ctx: &XdpContext) -> Result<(), ()> {
    let mut offset = 0usize;

    // ── Ethernet ─────────────────────────────────────────────────────────────
    let eth = unsafe { ptr_at::<EthHdr>(ctx, offset).ok_or(())? };
    offset = offset.saturating_add(mem::size_of::<EthHdr>());

    let mut eth_type = unsafe { (*eth).h_proto };

    // Up to two VLAN tags (QinQ / 802.1ad)
    if eth_type == ETH_P_8021Q || eth_type == ETH_P_8021AD {
        let vlan = unsafe { ptr_at::<VlanHdr>(ctx, offset).ok_or(())? };
        offset = offset.saturating_add(mem::size_of::<VlanHdr>());
        eth_type = unsafe { (*vlan).encapsulated_proto };
    }
    if eth_type == ETH_P_8021Q || eth_type == ETH_P_8021AD {
        let vlan = unsafe { ptr_at::<VlanHdr>(ctx, offset).ok_or(())? };
        offset = offset.saturating_add(mem::size_of::<VlanHdr>());
        eth_type = unsafe { (*vlan).encapsulated_proto };
    }

    if eth_type != ETH_P_IP {
        return Ok(());
    }

    // ── IPv4 ─────────────────────────────────────────────────────────────────
    let ip = unsafe { ptr_at::<IpHdr>(ctx, offset).ok_or(())? };

    let ip_hdr_len = unsafe { usize::from((*ip).ihl()).saturating_mul(4) };
    if ip_hdr_len < mem::size_of::<IpHdr>() {
        return Ok(());
    }
    offset = offset.saturating_add(mem::size_of::<IpHdr>());

    // Drop fragmented packets
    let frag_off = unsafe { (*ip).frag_off };
    if frag_off & (IP_MF | IP_OFFSET) != 0 {
        return Ok(());
    }

    if unsafe { (*ip).protocol } != IPPROTO_TCP {
        return Ok(());
    }

    // IP destination filter (0 = capture all)
    let dst_ip_val = unsafe { core::ptr::read_volatile(&dst_ip) };
    if dst_ip_val != 0 && unsafe { (*ip).daddr } != dst_ip_val {
        return Ok(());
    }

    // Skip IP options if present
    offset = offset.saturating_add(ip_hdr_len.saturating_sub(mem::size_of::<IpHdr>()));

    // ── TCP ──────────────────────────────────────────────────────────────────
    let tcp = unsafe { ptr_at::<TcpHdr>(ctx, offset).ok_or(())? };

    let tcp_hdr_len = unsafe { usize::from((*tcp).doff()).saturating_mul(4) };
    if tcp_hdr_len < mem::size_of::<TcpHdr>() {
        return Ok(());
    }

    // Port destination filter (0 = capture all)
    let dst_port_val = unsafe { core::ptr::read_volatile(&dst_port) };
    if dst_port_val != 0 && unsafe { (*tcp).dest } != dst_port_val {
        return Ok(());
    }

    // Only SYN (not SYN+ACK)
    if unsafe { !(*tcp).syn() || (*tcp).ack() } {
        return Ok(());
    }

    handle_tcp_syn(ctx, ip, tcp, ip_hdr_len)
}

fn handle_tcp_syn(
    ctx: &XdpContext,
    ip: *const IpHdr,
    tcp: *const TcpHdr,
    ip_hdr_len: usize,
) -> Result<(), ()> {
    // Read-modify-write on the map value pointer. Non-atomic but acceptable:
    // tick values are used only for stale-entry detection, not strict ordering.
    let tick = if let Some(counter_ptr) = syn_counter.get_ptr_mut(0) {
        let current = unsafe { *counter_ptr };
        unsafe { *counter_ptr = current.wrapping_add(1) };
        current
    } else {
        0u64
    };

    // ── Quirk bitmask ────────────────────────────────────────────────────────
    let mut quirks: u32 = 0;
    let frag_off = unsafe { (*ip).frag_off };
    let ip_id = unsafe { (*ip).id };
    let df = frag_off & IP_DF != 0;

    if df {
        quirks |= quirk_bits::DF;
    }
    if df && ip_id != 0 {
        quirks |= quirk_bits::NONZERO_ID;
    }
    if !df && ip_id == 0 {
        quirks |= quirk_bits::ZERO_ID;
    }
    if frag_off & IP_RF != 0 {
        quirks |= quirk_bits::MUST_BE_ZERO;
    }
    if unsafe { (*tcp).ece() || (*tcp).cwr() } {
        quirks |= quirk_bits::ECN;
    }
    if unsafe { (*tcp).seq } == 0 {
        quirks |= quirk_bits::SEQ_ZERO;
    }
    if unsafe { (*tcp).ack_seq } != 0 {
        quirks |= quirk_bits::ACK_NONZERO;
    }
    if unsafe { (*tcp).urg_ptr } != 0 {
        quirks |= quirk_bits::NONZERO_URG;
    }
    if unsafe { (*tcp).urg() } {
        quirks |= quirk_bits::URG;
    }
    if unsafe { (*tcp).psh() } {
        quirks |= quirk_bits::PUSH;
    }

    // ── Build map value ──────────────────────────────────────────────────────
    let tcp_hdr_len = unsafe { usize::from((*tcp).doff()).saturating_mul(4) };
    let optlen = tcp_hdr_len.saturating_sub(mem::size_of::<TcpHdr>()).min(TCPOPT_MAXLEN);

    let mut val = SynRawData {
        src_addr: unsafe { (*ip).saddr },
        src_port: unsafe { (*tcp).source },
        window: unsafe { (*tcp).window },
        optlen: optlen as u16,
        ip_ttl: unsafe { (*ip).ttl },
        ip_olen: ip_hdr_len.saturating_sub(mem::size_of::<IpHdr>()) as u8,
        options: [0u8; 40],
        quirks,
        tick,
    };

    // ── Copy TCP options ──────────────────────────────────────────────────────
    //
    // Derive the options pointer directly from `tcp` (PTR_TO_PACKET) rather
    // than re-deriving it from ctx.data() each loop iteration — the verifier
    // loses PTR_TO_PACKET tracking across reloads of ctx.data().
    let opts_ptr = unsafe { (tcp as *const u8).add(mem::size_of::<TcpHdr>()) };
    let data_end = ctx.data_end();
    for i in 0..TCPOPT_MAXLEN {
        if i >= optlen {
            break;
        }
        let byte_ptr = unsafe { opts_ptr.add(i) };
        let next_ptr = unsafe { byte_ptr.add(1) };
        if next_ptr as usize > data_end {
            break;
        }
        val.options[i] = unsafe { *byte_ptr };
    }

    let key = make_key(unsafe { (*ip).saddr }, unsafe { (*tcp).source });
    tcp_syn_map.insert(&key, &val, 0).map_err(|_| ())
}

#[inline(always)]
fn make_key(src_ip: u32, src_port: u16) -> u64 {
    ((src_ip as u64) << 16) | (src_port as u64)
}

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}
