//! Server-rendered HTML for the single-page console.

use alloy::primitives::Address;
use axum::response::Html;

use crate::explorer::{ExplorerLinks, LookupOutcome};
use crate::lottery::{Field, ParticipantList, PendingSummary, StatusSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome message shown at the top of the page after a form post.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub link: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            link,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            link: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupView {
    pub query: String,
    pub result: Result<LookupOutcome, String>,
}

pub struct PageView<'a> {
    pub status: &'a StatusSnapshot,
    pub pending: Option<PendingSummary>,
    pub notice: Option<Notice>,
    pub lookup: Option<LookupView>,
    pub links: &'a ExplorerLinks,
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn link(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
        escape(url),
        escape(label)
    )
}

fn address_link(links: &ExplorerLinks, address: &Address) -> String {
    link(&links.address_url(address), &address.to_checksum(None))
}

fn unavailable(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, escape(message))
}

pub fn render_page(view: &PageView<'_>) -> Html<String> {
    let mut body = String::new();

    if let Some(notice) = &view.notice {
        body.push_str(&render_notice(notice));
    }

    body.push_str(r#"<div class="columns"><section class="controls">"#);
    body.push_str(&render_manager(view));
    body.push_str(&render_entry(view.status, view.links));
    body.push_str(&render_lookup(view.lookup.as_ref()));
    body.push_str(r#"</section><section class="status">"#);
    body.push_str(&render_status(view.status, view.links));
    body.push_str("</section></div>");

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Lottery Console</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
.columns {{ display: flex; gap: 2rem; }}
.controls {{ flex: 1; }}
.status {{ flex: 2; }}
.error {{ color: #b00020; }}
.success {{ color: #1b5e20; }}
pre {{ background: #f4f4f4; padding: 1rem; overflow-x: auto; }}
</style>
</head>
<body>
<h1>Lottery Console</h1>
{body}
<hr>
<p><small>random() is a preview from contract state and is not a secure randomness source.</small></p>
</body>
</html>
"#
    ))
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Success => "success",
        NoticeKind::Error => "error",
    };
    let extra = notice
        .link
        .as_deref()
        .map(|url| format!(" {}", link(url, "View on explorer")))
        .unwrap_or_default();
    format!(
        r#"<p class="{}">{}{}</p>"#,
        class,
        escape(&notice.message),
        extra
    )
}

fn render_manager(view: &PageView<'_>) -> String {
    let onchain = match &view.status.manager {
        Field::Value(address) => address_link(view.links, address),
        Field::Unavailable(message) => escape(message),
    };

    let mut html = format!(
        r#"<h2>Manager actions</h2>
<p>On-chain manager: {onchain}</p>
<form method="post" action="/manager/prepare">
<label>Manager address (blank = on-chain manager)<br><input name="manager" size="44"></label><br>
<button type="submit">Prepare winner transaction</button>
</form>
"#
    );

    match &view.pending {
        Some(pending) => html.push_str(&format!(
            r#"<h3>Prepared transaction</h3>
<p>from {} · nonce {} · gas {} @ {} wei · prepared {}s ago</p>
<form method="post" action="/manager/send">
<label>Manager private key<br><input name="private_key" type="password" size="66" autocomplete="off"></label><br>
<button type="submit">Sign &amp; send winner transaction</button>
</form>
"#,
            escape(&pending.tx.from.to_checksum(None)),
            pending.tx.nonce,
            pending.tx.gas_limit,
            pending.tx.gas_price,
            pending.age_secs
        )),
        None => html.push_str("<p><em>No winner transaction prepared in this session.</em></p>\n"),
    }
    html
}

fn render_entry(status: &StatusSnapshot, links: &ExplorerLinks) -> String {
    format!(
        r#"<hr><h2>Enter the lottery</h2>
<p>Entering sends exactly {} ETH to {}.</p>
<form method="post" action="/enter">
<label>Your address<br><input name="sender" size="44"></label><br>
<label>Private key<br><input name="private_key" type="password" size="66" autocomplete="off"></label><br>
<button type="submit">Enter</button>
</form>
"#,
        escape(&status.entry_value.ether),
        address_link(links, &status.contract)
    )
}

fn render_lookup(lookup: Option<&LookupView>) -> String {
    let query = lookup.map(|l| escape(&l.query)).unwrap_or_default();
    let mut html = format!(
        r#"<hr><h2>Transaction lookup</h2>
<form method="post" action="/lookup">
<label>Transaction hash<br><input name="tx_hash" size="68" value="{query}"></label><br>
<button type="submit">Look up</button>
</form>
"#
    );

    if let Some(lookup) = lookup {
        match &lookup.result {
            Ok(LookupOutcome::Found(tx)) => {
                let pretty = serde_json::to_string_pretty(tx).unwrap_or_else(|_| tx.to_string());
                html.push_str(&format!("<pre>{}</pre>\n", escape(&pretty)));
            }
            Ok(LookupOutcome::NotFound) => html.push_str("<p>Transaction not found.</p>\n"),
            Err(message) => html.push_str(&unavailable(message)),
        }
    }
    html
}

fn render_status(status: &StatusSnapshot, links: &ExplorerLinks) -> String {
    let mut html = format!(
        "<h2>Contract status</h2>\n<p>Contract: {}</p>\n",
        address_link(links, &status.contract)
    );

    match &status.balance {
        Field::Value(amount) => html.push_str(&format!(
            "<p>Contract balance: <strong>{} ETH</strong></p>\n",
            escape(&amount.ether)
        )),
        Field::Unavailable(message) => html.push_str(&unavailable(message)),
    }

    if status.participant_count_partial {
        html.push_str(&format!(
            "<p>Participants count: at least {} (status read ran out of time)</p>\n",
            status.participant_count
        ));
    } else {
        html.push_str(&format!(
            "<p>Participants count: {}</p>\n",
            status.participant_count
        ));
    }
    match &status.participants {
        ParticipantList::Listed(players) if !players.is_empty() => {
            html.push_str("<ol>\n");
            for player in players {
                html.push_str(&format!("<li>{}</li>\n", address_link(links, player)));
            }
            html.push_str("</ol>\n");
        }
        ParticipantList::Listed(_) => {}
        ParticipantList::TooMany { limit } => html.push_str(&format!(
            "<p>Too many participants to show (&gt; {}).</p>\n",
            limit
        )),
        ParticipantList::Unavailable(message) => html.push_str(&unavailable(message)),
    }

    match &status.random {
        Field::Value(value) => html.push_str(&format!(
            "<p>random() preview (not secure): <code>{}</code></p>\n",
            value
        )),
        Field::Unavailable(message) => html.push_str(&unavailable(message)),
    }

    html.push_str("<hr><h2>Recent winners</h2>\n");
    match &status.recent_winners {
        Field::Value(winners) if winners.is_empty() => {
            html.push_str("<p>No WinnerSelected events found in recent range.</p>\n");
        }
        Field::Value(winners) => {
            html.push_str("<ul>\n");
            for event in winners {
                let tx = event
                    .tx_hash
                    .map(|hash| format!(" · {}", link(&links.tx_url(&hash), "tx")))
                    .unwrap_or_default();
                html.push_str(&format!(
                    "<li>{} · {} ETH{}</li>\n",
                    address_link(links, &event.winner),
                    escape(&event.amount.ether),
                    tx
                ));
            }
            html.push_str("</ul>\n");
        }
        Field::Unavailable(message) => html.push_str(&unavailable(message)),
    }
    html
}
