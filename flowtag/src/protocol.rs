use std::str::FromStr;

use strum_macros::{EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::error::FlowTagError;

/// IANA protocol numbers, see
/// https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml
///
/// Only the first 51 assignments (0 through 50) are known. Names are matched
/// ignoring ASCII case, so `tcp`, `Tcp` and `TCP` all resolve to 6.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Protocol {
    #[strum(serialize = "HOPOPT")]
    Hopopt = 0,
    #[strum(serialize = "ICMP")]
    Icmp = 1,
    #[strum(serialize = "IGMP")]
    Igmp = 2,
    #[strum(serialize = "GGP")]
    Ggp = 3,
    #[strum(serialize = "IPv4")]
    Ipv4 = 4,
    #[strum(serialize = "ST")]
    St = 5,
    #[strum(serialize = "TCP")]
    Tcp = 6,
    #[strum(serialize = "CBT")]
    Cbt = 7,
    #[strum(serialize = "EGP")]
    Egp = 8,
    #[strum(serialize = "IGP")]
    Igp = 9,
    #[strum(serialize = "BBN")]
    Bbn = 10,
    #[strum(serialize = "NVP")]
    Nvp = 11,
    #[strum(serialize = "PUP")]
    Pup = 12,
    #[strum(serialize = "ARGUS")]
    Argus = 13,
    #[strum(serialize = "EMCON")]
    Emcon = 14,
    #[strum(serialize = "XNET")]
    Xnet = 15,
    #[strum(serialize = "CHAOS")]
    Chaos = 16,
    #[strum(serialize = "UDP")]
    Udp = 17,
    #[strum(serialize = "MUX")]
    Mux = 18,
    #[strum(serialize = "DCN")]
    Dcn = 19,
    #[strum(serialize = "HMP")]
    Hmp = 20,
    #[strum(serialize = "PRM")]
    Prm = 21,
    #[strum(serialize = "XNS")]
    Xns = 22,
    #[strum(serialize = "TRUNK-1")]
    Trunk1 = 23,
    #[strum(serialize = "TRUNK-2")]
    Trunk2 = 24,
    #[strum(serialize = "LEAF-1")]
    Leaf1 = 25,
    #[strum(serialize = "LEAF-2")]
    Leaf2 = 26,
    #[strum(serialize = "RDP")]
    Rdp = 27,
    #[strum(serialize = "IRTP")]
    Irtp = 28,
    #[strum(serialize = "ISO-TP4")]
    IsoTp4 = 29,
    #[strum(serialize = "NETBLT")]
    Netblt = 30,
    #[strum(serialize = "MFE")]
    Mfe = 31,
    #[strum(serialize = "MERIT")]
    Merit = 32,
    #[strum(serialize = "DCCP")]
    Dccp = 33,
    #[strum(serialize = "3PC")]
    ThreePc = 34,
    #[strum(serialize = "IDPR")]
    Idpr = 35,
    #[strum(serialize = "XTP")]
    Xtp = 36,
    #[strum(serialize = "DDP")]
    Ddp = 37,
    #[strum(serialize = "IDPR-CMTP")]
    IdprCmtp = 38,
    #[strum(serialize = "TP++")]
    TpPlusPlus = 39,
    #[strum(serialize = "IL")]
    Il = 40,
    #[strum(serialize = "IPv6")]
    Ipv6 = 41,
    #[strum(serialize = "SDRP")]
    Sdrp = 42,
    #[strum(serialize = "IPv6-Route")]
    Ipv6Route = 43,
    #[strum(serialize = "IPv6-Frag")]
    Ipv6Frag = 44,
    #[strum(serialize = "IDRP")]
    Idrp = 45,
    #[strum(serialize = "RSVP")]
    Rsvp = 46,
    #[strum(serialize = "GRE")]
    Gre = 47,
    #[strum(serialize = "DSR")]
    Dsr = 48,
    #[strum(serialize = "BNA")]
    Bna = 49,
    #[strum(serialize = "ESP")]
    Esp = 50,
}

impl Protocol {
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The registered keyword, e.g. `"TCP"` or `"IPv6-Route"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn from_number(number: i64) -> Option<Self> {
        u8::try_from(number).ok().and_then(Protocol::from_repr)
    }
}

/// Resolves a protocol keyword to its IANA number.
///
/// ### Errors
///
/// Returns `FlowTagError::UnknownProtocolName` when the keyword is not one of
/// the registered names.
pub fn resolve(name: &str) -> Result<u8, FlowTagError> {
    Protocol::from_str(name)
        .map(Protocol::number)
        .map_err(|_| FlowTagError::UnknownProtocolName(name.to_string()))
}

/// Keyword for a protocol number, for log output only.
pub fn protocol_name(number: i64) -> Option<&'static str> {
    Protocol::from_number(number).map(Protocol::name)
}
