//! HTML templates for the survey wizard and admin dashboard.
//!
//! Plain server-rendered pages built with `format!`; no client
//! framework, no JS beyond what the browser gives us for free.

use homepoll_core::{SurveyRecord, BEST_FEATURES};
use homepoll_insights::{percent_of_max, phoenix_time, Distribution};

/// Shared stylesheet. Light theme, navy accents.
pub const CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{background:#fff;color:#1a1a2e;font-family:'Segoe UI',system-ui,sans-serif;line-height:1.6}
a{color:#1e3a8a;text-decoration:none}a:hover{text-decoration:underline}
.wrap{max-width:42rem;margin:0 auto;padding:2rem 1rem}
.wrap-wide{max-width:72rem;margin:0 auto;padding:2rem 1rem}
h1{color:#1e3a8a;font-size:1.6rem;margin-bottom:1.5rem}
h2{color:#1e3a8a;font-size:1.4rem;text-align:center;margin-bottom:1.5rem}
h3{color:#1e3a8a;font-size:1.15rem;margin-bottom:1rem}
h4{color:#374151;font-size:1rem;margin-bottom:0.75rem}
.question{display:block;font-size:1.1rem;font-weight:600;color:#111827;margin:1.5rem 0 0.75rem}
.error{background:#fef2f2;border:1px solid #fecaca;color:#b91c1c;padding:0.75rem 1rem;border-radius:8px;margin-bottom:1rem}
.choice{display:flex;align-items:center;gap:0.75rem;width:100%;padding:1rem;margin-bottom:0.75rem;border:2px solid #d1d5db;border-radius:8px;font-size:1.05rem;cursor:pointer}
.choice:hover{border-color:#1e3a8a}
.btn{display:block;width:100%;min-height:48px;padding:0.9rem 1.5rem;margin-bottom:0.75rem;background:#1e3a8a;color:#fff;font-size:1.15rem;font-weight:600;border:none;border-radius:8px;cursor:pointer;text-align:center}
.btn:hover{background:#1e40af}
.btn-secondary{background:#e5e7eb;color:#1f2937}
.btn-secondary:hover{background:#d1d5db}
textarea{width:100%;padding:0.75rem 1rem;border:2px solid #d1d5db;border-radius:8px;font-size:1.05rem;resize:vertical}
.lede{font-size:1.1rem;color:#374151;text-align:center;margin-bottom:1.5rem}
.card{background:#fff;border:1px solid #e5e7eb;border-radius:8px;box-shadow:0 1px 3px rgba(0,0,0,0.08);padding:1.5rem;margin-bottom:1.5rem}
.bar-row{display:flex;align-items:center;gap:1rem;margin-bottom:0.75rem}
.bar-label{width:9rem;font-size:0.9rem;color:#374151}
.bar-track{flex:1;background:#e5e7eb;border-radius:999px;height:2rem;overflow:hidden}
.bar-fill{background:#1e3a8a;color:#fff;height:100%;border-radius:999px;display:flex;align-items:center;justify-content:center;font-size:0.85rem;font-weight:600}
.bar-count{width:3rem;text-align:right;font-size:0.9rem;color:#374151}
.tally{display:flex;justify-content:space-between;background:#f9fafb;border-radius:8px;padding:0.75rem 1rem;margin-bottom:0.5rem}
.tally .n{color:#1e3a8a;font-weight:700;font-size:1.1rem}
.comment{border-left:4px solid #1e3a8a;background:#f9fafb;border-radius:0 8px 8px 0;padding:0.75rem 1rem;margin-bottom:1rem}
.comment .meta{font-size:0.85rem;color:#6b7280;margin-top:0.5rem}
.muted{color:#6b7280}
.placeholder{color:#9ca3af;font-style:italic}
table{width:100%;border-collapse:collapse;font-size:0.9rem}
th{background:#f9fafb;color:#111827;text-transform:uppercase;font-size:0.75rem;letter-spacing:0.05em}
th,td{padding:0.75rem;text-align:left;border-bottom:1px solid #e5e7eb}
tr:hover td{background:#f9fafb}
.check{font-size:3.5rem;color:#16a34a;text-align:center}
.center{text-align:center}
"#;

/// Minimal HTML escaping for user-supplied strings.
pub fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn attr(raw: &str) -> String {
    escape(raw)
}

/// Survey-page shell: property heading over a narrow column.
pub fn survey_layout(property: &str, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title} — {property}</title><style>{CSS}</style></head>
<body><div class="wrap"><h1>{property}</h1>{body}</div></body></html>"#,
        title = escape(title),
        property = escape(property),
    )
}

fn hidden_params(range: Option<&str>, email: Option<&str>, token: Option<&str>) -> String {
    let mut fields = String::new();
    if let Some(range) = range {
        fields.push_str(&format!(
            r#"<input type="hidden" name="range" value="{}">"#,
            attr(range)
        ));
    }
    if let Some(email) = email {
        fields.push_str(&format!(
            r#"<input type="hidden" name="email" value="{}">"#,
            attr(email)
        ));
    }
    if let Some(token) = token {
        fields.push_str(&format!(
            r#"<input type="hidden" name="sid" value="{}">"#,
            attr(token)
        ));
    }
    fields
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|msg| format!(r#"<div class="error">{}</div>"#, escape(msg)))
        .unwrap_or_default()
}

/// Step 1: the initial band question, one submit button per band.
pub fn step1_page(
    property: &str,
    bands: &[&str],
    email: Option<&str>,
    token: Option<&str>,
    error: Option<&str>,
) -> String {
    let buttons: String = bands
        .iter()
        .map(|band| {
            format!(
                r#"<button class="btn" type="submit" name="range" value="{value}">{label}</button>"#,
                value = attr(band),
                label = escape(band),
            )
        })
        .collect();
    let body = format!(
        r#"<h2>In your professional opinion, what price range feels right for this home?</h2>
{error}<form method="POST" action="/survey/step1">{hidden}{buttons}</form>"#,
        error = error_banner(error),
        hidden = hidden_params(None, email, token),
    );
    survey_layout(property, "Price Opinion", &body)
}

/// Step 2: pure branch, two links styled as buttons.
pub fn step2_page(property: &str, continue_href: &str, finish_href: &str) -> String {
    let body = format!(
        r#"<h2>Thank you! Your vote is saved.</h2>
<p class="lede">If you have 60 seconds, I have 3 quick questions to help me understand your choice. Would you be open to sharing more?</p>
<a class="btn" href="{continue_href}">Yes, I can help</a>
<a class="btn btn-secondary" href="{finish_href}">No, I am finished</a>"#,
    );
    survey_layout(property, "Thank You", &body)
}

fn radio_group(name: &str, options: &[String]) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                r#"<label class="choice"><input type="radio" name="{name}" value="{value}"> {label}</label>"#,
                value = attr(option),
                label = escape(option),
            )
        })
        .collect()
}

/// Step 3: the three follow-up questions. The resolved range rides along
/// as a hidden field so submit resolves to the same sub-band set.
pub fn step3_page(
    property: &str,
    resolved_range: &str,
    increments: &[String],
    email: Option<&str>,
    token: Option<&str>,
    error: Option<&str>,
) -> String {
    let features: Vec<String> = BEST_FEATURES.iter().map(|f| f.to_string()).collect();
    let body = format!(
        r#"<h2>3 Quick Questions</h2>
{error}<form method="POST" action="/survey/step3">{hidden}
<label class="question">What is a more specific price range you would suggest?</label>
{price_radios}
<label class="question">What is the best thing about this house?</label>
{feature_radios}
<label class="question" for="improvement_note">Is there one thing that could be improved to help it sell faster?</label>
<textarea id="improvement_note" name="improvement_note" rows="4" placeholder="Share your thoughts..."></textarea>
<button class="btn" type="submit" style="margin-top:1.5rem">Submit</button>
</form>"#,
        error = error_banner(error),
        hidden = hidden_params(Some(resolved_range), email, token),
        price_radios = radio_group("specific_price", increments),
        feature_radios = radio_group("best_feature", &features),
    );
    survey_layout(property, "3 Quick Questions", &body)
}

/// Terminal thank-you page.
pub fn success_page(property: &str) -> String {
    let body = r#"<div class="check">&#10003;</div>
<h2>Thank you for your help.</h2>
<p class="lede">I will email the full report to you next week!</p>"#;
    survey_layout(property, "Thank You", body)
}

fn chart(title: &str, bars: &[Distribution]) -> String {
    let rows: String = bars
        .iter()
        .map(|bar| {
            let width = percent_of_max(bars, bar.count);
            let count_label = if bar.count > 0 { bar.count.to_string() } else { String::new() };
            format!(
                r#"<div class="bar-row"><div class="bar-label">{label}</div>
<div class="bar-track"><div class="bar-fill" style="width:{width:.0}%">{count_label}</div></div>
<div class="bar-count">{count}</div></div>"#,
                label = escape(&bar.label),
                count = bar.count,
            )
        })
        .collect();
    format!(r#"<div class="card"><h3>{}</h3>{rows}</div>"#, escape(title))
}

fn tally_list(bars: &[Distribution], empty_message: &str) -> String {
    if bars.is_empty() {
        return format!(r#"<p class="muted">{}</p>"#, escape(empty_message));
    }
    bars.iter()
        .map(|bar| {
            format!(
                r#"<div class="tally"><span>{label}</span><span class="n">{count}</span></div>"#,
                label = escape(&bar.label),
                count = bar.count,
            )
        })
        .collect()
}

fn table_cell(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("<td>{}</td>", escape(v)),
        _ => format!(r#"<td><span class="placeholder">{placeholder}</span></td>"#),
    }
}

/// The admin dashboard: price chart, sentiment summary, comment list,
/// raw response table. `records` arrive newest first.
pub fn admin_page(
    property: &str,
    records: &[SurveyRecord],
    price_bars: &[Distribution],
    feature_bars: &[Distribution],
    themes: &[Distribution],
    comments: &[&SurveyRecord],
) -> String {
    let comment_blocks: String = if comments.is_empty() {
        r#"<p class="muted">No improvement comments yet.</p>"#.to_string()
    } else {
        comments
            .iter()
            .map(|record| {
                let email_suffix = record
                    .agent_email
                    .as_deref()
                    .map(|email| format!(" &bull; {}", escape(email)))
                    .unwrap_or_default();
                format!(
                    r#"<div class="comment"><p>{note}</p><p class="meta">{when}{email_suffix}</p></div>"#,
                    note = escape(record.improvement_note.as_deref().unwrap_or_default()),
                    when = phoenix_time(record.created_at),
                )
            })
            .collect()
    };

    let table = if records.is_empty() {
        r#"<p class="muted">No responses yet.</p>"#.to_string()
    } else {
        let rows: String = records
            .iter()
            .map(|record| {
                format!(
                    "<tr>{email}{range}{price}{feature}{note}<td>{when}</td></tr>",
                    email = table_cell(record.agent_email.as_deref(), "Not provided"),
                    range = table_cell(Some(record.initial_range.as_str()), "&mdash;"),
                    price = table_cell(record.specific_price.as_deref(), "&mdash;"),
                    feature = table_cell(record.best_feature.as_deref(), "&mdash;"),
                    note = table_cell(record.improvement_note.as_deref(), "&mdash;"),
                    when = phoenix_time(record.created_at),
                )
            })
            .collect();
        format!(
            r#"<table><thead><tr><th>Agent Email</th><th>Initial Range</th><th>Specific Price</th><th>Best Feature</th><th>Improvement Note</th><th>Date (Arizona)</th></tr></thead><tbody>{rows}</tbody></table>"#
        )
    };

    let body = format!(
        r#"<h1>Admin Dashboard</h1>
<p class="muted" style="margin-bottom:1.5rem">{property} - Survey Responses ({total} total)</p>
{price_chart}
<div class="card"><h3>Sentiment Summary</h3>
<h4>Most Popular Best Features</h4>
{feature_list}
<h4 style="margin-top:1.5rem">Common Improvement Themes</h4>
{theme_list}
</div>
<div class="card"><h3>All Improvement Comments ({comment_count})</h3>{comment_blocks}</div>
<div class="card"><h3>All Survey Responses ({total})</h3>{table}</div>"#,
        property = escape(property),
        total = records.len(),
        price_chart = chart("Price Range Distribution", price_bars),
        feature_list = tally_list(feature_bars, "No feature selections yet."),
        theme_list = tally_list(themes, "No improvement themes identified yet."),
        comment_count = comments.len(),
    );

    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Admin Dashboard — {property}</title><style>{CSS}</style></head>
<body><div class="wrap-wide">{body}</div></body></html>"#,
        property = escape(property),
    )
}

/// Blocking error panel shown when the bulk fetch fails; no partial data.
pub fn admin_error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8">
<title>Admin Dashboard</title><style>{CSS}</style></head>
<body><div class="wrap"><div class="error"><strong>Error</strong><p>{}</p></div></div></body></html>"#,
        escape(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & co"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; co"
        );
    }

    #[test]
    fn step1_renders_one_button_per_band() {
        let html = step1_page(
            "3561 W Dublin St",
            &["$601k–$700k", "$501k–$600k", "$401k–$500k"],
            Some("a@x.com"),
            None,
            None,
        );
        assert_eq!(html.matches(r#"type="submit""#).count(), 3);
        assert!(html.contains(r#"name="email" value="a@x.com""#));
        assert!(!html.contains(r#"name="sid""#));
    }

    #[test]
    fn step3_renders_sub_band_and_feature_radios() {
        let increments = vec!["$501k–$520k".to_string(), "$521k–$540k".to_string()];
        let html = step3_page("p", "$501k–$600k", &increments, None, Some("tok"), Some("oops"));
        assert_eq!(html.matches(r#"name="specific_price""#).count(), 2);
        assert_eq!(html.matches(r#"name="best_feature""#).count(), 5);
        assert!(html.contains(r#"name="range" value="$501k–$600k""#));
        assert!(html.contains(r#"class="error""#));
    }

    #[test]
    fn admin_page_shows_empty_states() {
        let html = admin_page("p", &[], &[], &[], &[], &[]);
        assert!(html.contains("No responses yet."));
        assert!(html.contains("No feature selections yet."));
        assert!(html.contains("No improvement themes identified yet."));
        assert!(html.contains("No improvement comments yet."));
    }
}
