// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared `reqwest` client construction with a consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Creates a new HTTP client builder with the standard Loom User-Agent header.
///
/// Use this when you need to customize the client (e.g., set a proxy or
/// connection pool limits) before handing it to
/// [`ReqwestTransport::with_client`](crate::ReqwestTransport::with_client).
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard Loom User-Agent string.
///
/// Format: `loom/{os}-{arch}/{version}`
pub fn user_agent() -> String {
	format!(
		"loom/{}-{}/{}",
		std::env::consts::OS,
		std::env::consts::ARCH,
		env!("CARGO_PKG_VERSION")
	)
}
