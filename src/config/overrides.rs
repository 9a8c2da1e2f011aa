// src/config/overrides.rs

//! Layering of command-line / environment values over the TOML file.
//!
//! clap already resolves flag-over-environment; anything it leaves as `None`
//! keeps the value from the file (or the section default).

use crate::cli::{ConvertArgs, TailArgs};
use crate::config::model::{HecSection, RawConfigFile};
use crate::types::RunMode;

/// Apply `tail` arguments onto `[tail]`.
pub fn apply_tail_overrides(raw: &mut RawConfigFile, args: &TailArgs) {
    let tail = &mut raw.tail;

    if let Some(dir) = &args.data_dir {
        tail.data_dir = dir.clone();
    }
    if let Some(dir) = &args.state_dir {
        tail.state_dir = dir.clone();
    }
    if let Some(secs) = args.poll_interval {
        tail.poll_interval = secs;
    }
    if let Some(sourcetype) = &args.sourcetype {
        tail.sourcetype = sourcetype.clone();
    }
    if let Some(mode) = args.mode {
        tail.mode = mode;
    }
    if args.once {
        tail.mode = RunMode::Once;
    }
    if let Some(ext) = &args.extension {
        tail.extension = ext.clone();
    }
}

/// Apply `convert` arguments onto `[convert]` and `[hec]`.
///
/// A `[hec]` section is created when a host or token is supplied on the
/// command line; the remaining HEC flags only adjust an existing section.
pub fn apply_convert_overrides(raw: &mut RawConfigFile, args: &ConvertArgs) {
    let convert = &mut raw.convert;

    if let Some(dir) = &args.data_dir {
        convert.data_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        convert.output_dir = dir.clone();
    }
    if let Some(sourcetype) = &args.sourcetype {
        convert.sourcetype = sourcetype.clone();
    }
    if let Some(host) = &args.event_host {
        convert.host = host.clone();
    }
    if let Some(index) = &args.index {
        convert.index = index.clone();
    }
    if let Some(ext) = &args.extension {
        convert.extension = ext.clone();
    }

    if raw.hec.is_none() && (args.hec_host.is_some() || args.hec_token.is_some()) {
        raw.hec = Some(HecSection::new(String::new(), String::new()));
    }

    if let Some(hec) = raw.hec.as_mut() {
        if let Some(host) = &args.hec_host {
            hec.host = host.clone();
        }
        if let Some(token) = &args.hec_token {
            hec.token = token.clone();
        }
        if let Some(port) = args.hec_port {
            hec.port = port;
        }
        if let Some(protocol) = args.protocol {
            hec.protocol = protocol;
        }
        if args.insecure {
            hec.verify_tls = false;
        }
        if let Some(size) = args.batch_size {
            hec.batch_size = size;
        }
    }
}
