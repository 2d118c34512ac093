//! [DTEK](https://www.dtek-dnem.com.ua/ua/shutdowns) outage schedule client.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Local;
use http::{HeaderMap, HeaderValue, header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    api::schedule_source::ScheduleSource,
    core::{RawSchedule, label::leading_number},
    prelude::*,
};

const CSRF_FIELD_NAME: &str = "_csrf-dtek-dnem";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Household address as it is known to DTEK.
#[derive(Clone, Debug)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house: String,

    /// Outage queue, for example `GPV1.1`.
    pub queue: String,
}

pub struct Api {
    client: Client,
    base_url: Url,
    address: Address,
}

impl Api {
    pub fn new(base_url: Url, address: Address) -> Result<Self> {
        let referer = Self::form_url(&base_url)?;
        let origin = base_url.as_str().trim_end_matches('/');
        let mut headers = HeaderMap::new();
        headers.append(header::REFERER, HeaderValue::from_str(referer.as_str())?);
        headers.append(header::ORIGIN, HeaderValue::from_str(origin)?);
        headers.append("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .cookie_store(true)
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base_url, address })
    }

    fn form_url(base_url: &Url) -> Result<Url> {
        Ok(base_url.join("ua/shutdowns")?)
    }

    /// Fetch the shutdowns page in order to obtain the session cookie and the CSRF token.
    #[instrument(skip_all)]
    async fn get_csrf_token(&self) -> Result<String> {
        let url = Self::form_url(&self.base_url)?;
        debug!(%url, "requesting the CSRF token…");
        let html = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request the shutdowns page")?
            .error_for_status()?
            .text()
            .await
            .context("failed to read the shutdowns page")?;
        let token = extract_csrf_token(&html).context("the CSRF token is missing on the page")?;
        Ok(token.to_string())
    }

    #[instrument(skip_all, fields(queue = %self.address.queue))]
    async fn get_home_schedule(&self, csrf_token: &str) -> Result<Response> {
        let update_fact = Local::now().format("%d.%m.%Y %H:%M").to_string();
        let request = GetHomeNumRequest {
            csrf_token,
            method: "getHomeNum",
            data: vec![
                Field { name: "city", value: &self.address.city },
                Field { name: "street", value: &self.address.street },
                Field { name: "house", value: &self.address.house },
                Field { name: "updateFact", value: &update_fact },
            ],
        };
        let body = serde_qs::to_string(&request).context("failed to encode the request")?;
        debug!(update_fact, "requesting the schedule…");
        self.client
            .post(self.base_url.join("ua/ajax")?)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded; charset=UTF-8")
            .body(body)
            .send()
            .await
            .context("failed to request the schedule")?
            .error_for_status()
            .context("the schedule request failed")?
            .json::<Response>()
            .await
            .context("failed to deserialize the schedule")
    }
}

#[async_trait]
impl ScheduleSource for Api {
    #[instrument(skip_all, fields(queue = %self.address.queue))]
    async fn fetch(&self) -> Result<RawSchedule> {
        let csrf_token = self.get_csrf_token().await?;
        let raw_schedule =
            self.get_home_schedule(&csrf_token).await?.into_raw_schedule(&self.address.queue);
        info!(
            n_intervals = raw_schedule.intervals.as_ref().map_or(0, HashMap::len),
            n_statuses = raw_schedule.statuses.as_ref().map_or(0, HashMap::len),
            "fetched",
        );
        Ok(raw_schedule)
    }
}

/// Value of the hidden CSRF input.
///
/// Tag and attribute names are case-insensitive, values may be quoted either way or not at all.
fn extract_csrf_token(html: &str) -> Option<&str> {
    html.split('<')
        .filter_map(|tag| {
            let (name, rest) = tag.split_at_checked(5)?;
            let is_input = name.eq_ignore_ascii_case("input")
                && rest.starts_with(|c: char| c.is_whitespace() || c == '/' || c == '>');
            is_input.then(|| rest.split_once('>').map_or(rest, |(attributes, _)| attributes))
        })
        .map(parse_attributes)
        .find(|attributes| {
            attributes
                .iter()
                .any(|(name, value)| name.eq_ignore_ascii_case("name") && *value == CSRF_FIELD_NAME)
        })?
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("value"))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Split the inside of a tag into `(name, value)` pairs, valueless attributes get an empty value.
fn parse_attributes(mut rest: &str) -> Vec<(&str, &str)> {
    let mut attributes = Vec::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return attributes;
        }
        let name_end = rest.find(|c: char| c.is_whitespace() || c == '=' || c == '/');
        let (name, after_name) = rest.split_at(name_end.unwrap_or(rest.len()));
        let after_name = after_name.trim_start();
        let Some(after_equals) = after_name.strip_prefix('=') else {
            attributes.push((name, ""));
            rest = after_name;
            continue;
        };
        let after_equals = after_equals.trim_start();
        let (value, remainder) = match after_equals.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let quoted = &after_equals[1..];
                quoted.split_once(quote).unwrap_or((quoted, ""))
            }
            _ => after_equals
                .split_at(after_equals.find(char::is_whitespace).unwrap_or(after_equals.len())),
        };
        attributes.push((name, value));
        rest = remainder;
    }
}

#[derive(Serialize)]
struct GetHomeNumRequest<'a> {
    #[serde(rename = "_csrf-dtek-dnem")]
    csrf_token: &'a str,

    method: &'static str,

    /// Encoded as `data[0][name]=…&data[0][value]=…`.
    data: Vec<Field<'a>>,
}

#[derive(Serialize)]
struct Field<'a> {
    name: &'static str,
    value: &'a str,
}

#[derive(Deserialize)]
struct Response {
    fact: Option<Fact>,
    preset: Option<Preset>,
}

impl Response {
    fn into_raw_schedule(self, queue: &str) -> RawSchedule {
        let intervals = self.preset.and_then(|preset| preset.time_zone);
        let statuses = self.fact.and_then(|fact| fact.into_statuses(queue));
        if statuses.is_none() {
            warn!(queue, "no statuses for the queue");
        }
        RawSchedule { intervals, statuses }
    }
}

#[derive(Deserialize)]
struct Preset {
    /// Interval key to `["00-01", "00:00", "01:00"]`.
    time_zone: Option<HashMap<String, Vec<String>>>,
}

#[serde_as]
#[derive(Deserialize)]
struct Fact {
    /// Day timestamp to queue to interval key to status token.
    #[serde(default)]
    data: HashMap<String, HashMap<String, HashMap<String, serde_json::Value>>>,

    /// Timestamp of the current day, comes as either a number or a string.
    #[serde_as(as = "Option<serde_with::PickFirst<(_, serde_with::DisplayFromStr)>>")]
    today: Option<i64>,
}

impl Fact {
    /// Statuses of today, or of the earliest published day.
    fn into_statuses(mut self, queue: &str) -> Option<HashMap<String, String>> {
        let day_key = self
            .today
            .map(|today| today.to_string())
            .filter(|today| self.data.contains_key(today))
            .or_else(|| self.data.keys().min_by_key(|key| leading_number(key)).cloned())?;
        let statuses = self.data.remove(&day_key)?.remove(queue)?;
        Some(
            statuses
                .into_iter()
                .filter_map(|(key, token)| token.as_str().map(|token| (key, token.to_string())))
                .collect(),
        )
    }
}
