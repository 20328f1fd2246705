//! Turns a reconciliation into a Slack message

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CheckerConfig;
use crate::models::{Batch, Reconciliation, SlackAttachment, SlackField, SlackPayload};

/// `<!subteam^ID|name>`, `<!here|here>` and similar labelled mentions
static LABELLED_MENTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!([^|>]+)\|([^>]+)>").unwrap());

/// `<!here>`, `<!channel>` without a label
static BARE_MENTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!([^|>]+)>").unwrap());

/// Turn literal `\n` sequences typed on the command line into newlines
pub fn expand_newline_escapes(template: &str) -> String {
    template.replace("\\n", "\n")
}

/// Rewrite broadcast mentions into inert text, e.g. `` `@name` ``
pub fn defuse_mentions(text: &str) -> String {
    let text = LABELLED_MENTION_REGEX.replace_all(text, "`@${2}`");
    BARE_MENTION_REGEX.replace_all(&text, "`@${1}`").into_owned()
}

/// Builds the notification payload for one run
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    not_migrated_message: String,
    all_migrated_message: Option<String>,
    dry_run: bool,
    attachment_color: String,
    nothing_missing_message: String,
}

impl ReportFormatter {
    pub fn from_config(config: &CheckerConfig) -> Self {
        Self {
            not_migrated_message: config.not_migrated_sql_exists_message.clone(),
            all_migrated_message: config.all_migrated_message.clone(),
            dry_run: config.dry_run,
            attachment_color: config.notification.attachment_color.clone(),
            nothing_missing_message: config.notification.nothing_missing_message.clone(),
        }
    }

    /// Expand escapes, then defuse mentions when dry running
    pub fn render_template(&self, template: &str) -> String {
        let text = expand_newline_escapes(template);
        if self.dry_run {
            defuse_mentions(&text)
        } else {
            text
        }
    }

    /// Payload to post, or `None` when there is nothing to say
    pub fn format(&self, reconciliation: &Reconciliation) -> Option<SlackPayload> {
        if reconciliation.is_fully_migrated() {
            return self
                .all_migrated_message
                .as_deref()
                .map(|template| SlackPayload::new(self.render_template(template)));
        }

        let payload = reconciliation.batches.iter().fold(
            SlackPayload::new(self.render_template(&self.not_migrated_message)),
            |payload, batch| payload.with_attachment(self.batch_attachment(batch)),
        );

        Some(payload)
    }

    fn batch_attachment(&self, batch: &Batch) -> SlackAttachment {
        let fields = batch
            .shards
            .iter()
            .map(|missing| {
                let value = if missing.files.is_empty() {
                    self.nothing_missing_message.clone()
                } else {
                    missing.files.join("\n")
                };
                SlackField::short(missing.shard.display_name(), value)
            })
            .collect();

        SlackAttachment {
            title: Some(batch.key.clone()),
            color: Some(self.attachment_color.clone()),
            text: Some(batch.files.join("\n")),
            fields,
            mrkdwn_in: vec!["text".to_string(), "fields".to_string()],
        }
    }
}
