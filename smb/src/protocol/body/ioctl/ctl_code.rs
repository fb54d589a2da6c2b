//! FSCTL/IOCTL control codes this server gives special meaning to.
//!
//! MS-FSCC defines several hundred control codes; almost all of them address
//! RDMA, DFS referral, and remote-copy functionality this server does not
//! implement. Rather than modelling each one as its own wire type, `ctl_code`
//! is carried as a raw `u32` and only the codes the dispatcher actually acts
//! on get a name here. Everything else passes through as an opaque buffer.

pub const FSCTL_PIPE_TRANSCEIVE: u32 = 0x0011_C017;
pub const FSCTL_PIPE_PEEK: u32 = 0x0011_400C;
pub const FSCTL_PIPE_WAIT: u32 = 0x0011_0018;
pub const FSCTL_VALIDATE_NEGOTIATE_INFO: u32 = 0x0014_0204;
