//! `brewup://` deep links.
//!
//! A link carries one drink record as JSON, base64-encoded into the `data`
//! query parameter: `brewup://<action>?data=<base64>`. The action is the URL
//! host; only [`DRINK_ACTION`] is acted on, but any action parses.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde_json::Value;
use url::Url;

use crate::drink::Drink;
use crate::record::{DrinkRecord, drink_to_record};

pub const SCHEME: &str = "brewup";
pub const DRINK_ACTION: &str = "drink";
pub const DATA_PARAM: &str = "data";

/// Result of parsing a deep link.
///
/// An action without data is a normal outcome (e.g. a link whose payload was
/// truncated) and is distinct from a link that yields nothing at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeepLink {
    pub action: Option<String>,
    pub data: Option<DrinkRecord>,
}

impl DeepLink {
    pub fn is_total_failure(&self) -> bool {
        self.action.is_none() && self.data.is_none()
    }

    /// The record, if this link is a drink share.
    pub fn drink_record(&self) -> Option<&DrinkRecord> {
        match self.action.as_deref() {
            Some(DRINK_ACTION) => self.data.as_ref(),
            _ => None,
        }
    }
}

/// Build `brewup://<action>?data=<base64 JSON>`.
///
/// Returns `None` when the record cannot be serialized or `action` is not
/// exactly a URL host: anything that would parse into a path, userinfo, port,
/// query or fragment is refused so the link decodes back to the same action.
pub fn encode(action: &str, record: &DrinkRecord) -> Option<Url> {
    let json = match serde_json::to_vec(record) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(action, "failed to serialize deep-link record: {err}");
            return None;
        }
    };

    let mut url = match Url::parse(&format!("{SCHEME}://{action}")) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(action, "invalid deep-link action: {err}");
            return None;
        }
    };
    if !is_bare_host(&url, action) {
        tracing::warn!(action, %url, "deep-link action is not a bare host");
        return None;
    }
    // Form encoding escapes `+`, `/` and `=` so the payload survives any query parser.
    url.query_pairs_mut().append_pair(DATA_PARAM, &STANDARD.encode(json));
    Some(url)
}

fn is_bare_host(url: &Url, action: &str) -> bool {
    !action.is_empty()
        && url.host_str() == Some(action)
        && url.username().is_empty()
        && url.password().is_none()
        && url.port().is_none()
        && (url.path().is_empty() || url.path() == "/")
        && url.query().is_none()
        && url.fragment().is_none()
}

pub fn decode(url: &Url) -> DeepLink {
    let action = url.host_str().map(str::to_string);
    let data = decode_data(url);
    DeepLink { action, data }
}

/// Parse `input` as a URL first; unparseable text yields neither action nor data.
pub fn decode_str(input: &str) -> DeepLink {
    match Url::parse(input.trim()) {
        Ok(url) => decode(&url),
        Err(err) => {
            tracing::debug!("rejected deep link {input:?}: {err}");
            DeepLink::default()
        }
    }
}

/// `encode("drink", drink_to_record(drink))`.
pub fn share_link(drink: &Drink) -> Option<Url> {
    encode(DRINK_ACTION, &drink_to_record(drink))
}

fn decode_data(url: &Url) -> Option<DrinkRecord> {
    if url.query().is_none() {
        tracing::debug!(%url, "deep link has no query");
        return None;
    }

    let Some((_, raw)) = url.query_pairs().find(|(name, _)| name == DATA_PARAM) else {
        tracing::debug!(%url, "deep link has no data parameter");
        return None;
    };
    // Base64 has no spaces; a space here is a `+` that was sent unescaped.
    let payload = raw.replace(' ', "+");

    let bytes = match STANDARD.decode(&payload).or_else(|_| URL_SAFE.decode(&payload)) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(%url, "deep link data is not base64: {err}");
            return None;
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(record)) => Some(record),
        Ok(_) => {
            tracing::debug!(%url, "deep link data is not a JSON object");
            None
        }
        Err(err) => {
            tracing::debug!(%url, "deep link data is not JSON: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drink::CreateDrink;
    use serde_json::json;

    fn record(value: Value) -> DrinkRecord {
        value.as_object().cloned().unwrap()
    }

    fn link_with_data(data: &str) -> Url {
        Url::parse(&format!("brewup://drink?data={data}")).unwrap()
    }

    #[test]
    fn encode_builds_the_fixed_url_shape() {
        let url = encode("drink", &record(json!({"name": "Latte"}))).unwrap();
        assert_eq!(url.scheme(), "brewup");
        assert_eq!(url.host_str(), Some("drink"));
        assert!(url.as_str().starts_with("brewup://drink?data="));
    }

    #[test]
    fn payload_is_standard_base64_json() {
        let r = record(json!({"name": "Mocha", "prepTime": 7}));
        let url = encode("drink", &r).unwrap();
        let (_, data) = url.query_pairs().find(|(k, _)| k == "data").unwrap();
        let bytes = STANDARD.decode(data.as_bytes()).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, json!({"name": "Mocha", "prepTime": 7}));
    }

    #[test]
    fn round_trip_returns_action_and_equal_record() {
        let r = record(json!({
            "name": "Chai ½ sweet?",
            "tags": ["Default", "Favorite"],
            "prepTime": 12,
            "ingredients": "Black Tea|Milk|",
            "rating": 4.5,
            "flag": true,
        }));
        let link = decode(&encode("drink", &r).unwrap());
        assert_eq!(link.action.as_deref(), Some("drink"));
        assert_eq!(link.data, Some(r));
    }

    #[test]
    fn unknown_actions_parse_syntactically() {
        let link = decode(&encode("menu", &DrinkRecord::new()).unwrap());
        assert_eq!(link.action.as_deref(), Some("menu"));
        assert_eq!(link.data, Some(DrinkRecord::new()));
        assert!(link.drink_record().is_none());
    }

    #[test]
    fn invalid_action_host_produces_no_url() {
        assert!(encode("bad host", &DrinkRecord::new()).is_none());
        assert!(encode("", &DrinkRecord::new()).is_none());
    }

    #[test]
    fn action_with_path_is_refused() {
        assert!(encode("drink/extra", &DrinkRecord::new()).is_none());
        assert!(encode("drink/", &DrinkRecord::new()).is_none());
    }

    #[test]
    fn action_with_userinfo_is_refused() {
        assert!(encode("a@drink", &DrinkRecord::new()).is_none());
        assert!(encode("a:b@drink", &DrinkRecord::new()).is_none());
    }

    #[test]
    fn action_with_fragment_query_or_port_is_refused() {
        assert!(encode("drink#x", &DrinkRecord::new()).is_none());
        assert!(encode("drink?data=e30=", &DrinkRecord::new()).is_none());
        assert!(encode("drink:80", &DrinkRecord::new()).is_none());
    }

    #[test]
    fn accepted_actions_decode_to_themselves() {
        for action in ["drink", "menu", "drink-share", "v2.drink"] {
            let url = encode(action, &DrinkRecord::new()).unwrap();
            assert_eq!(decode(&url).action.as_deref(), Some(action));
        }
    }

    #[test]
    fn missing_query_keeps_action_only() {
        let link = decode(&Url::parse("brewup://drink").unwrap());
        assert_eq!(link.action.as_deref(), Some("drink"));
        assert!(link.data.is_none());
        assert!(!link.is_total_failure());
    }

    #[test]
    fn missing_data_param_keeps_action_only() {
        let link = decode(&Url::parse("brewup://drink?other=1").unwrap());
        assert_eq!(link.action.as_deref(), Some("drink"));
        assert!(link.data.is_none());
    }

    #[test]
    fn invalid_base64_yields_no_data() {
        let link = decode(&link_with_data("%%%not-base64%%%"));
        assert_eq!(link.action.as_deref(), Some("drink"));
        assert!(link.data.is_none());
    }

    #[test]
    fn non_object_json_yields_no_data() {
        let array = STANDARD.encode(b"[1,2,3]");
        assert!(decode(&link_with_data(&array)).data.is_none());

        let garbage = STANDARD.encode(b"{not json");
        assert!(decode(&link_with_data(&garbage)).data.is_none());
    }

    #[test]
    fn tolerates_unescaped_plus_in_payload() {
        // `{"a":">>>"}` encodes with a `+` in standard base64.
        let encoded = STANDARD.encode(br#"{"a":">>>"}"#);
        assert!(encoded.contains('+'));
        let link = decode(&link_with_data(&encoded));
        assert_eq!(link.data, Some(record(json!({"a": ">>>"}))));
    }

    #[test]
    fn accepts_url_safe_alphabet() {
        let encoded = URL_SAFE.encode(br#"{"a":">>>"}"#);
        let link = decode(&link_with_data(&encoded));
        assert_eq!(link.data, Some(record(json!({"a": ">>>"}))));
    }

    #[test]
    fn decode_str_rejects_non_urls() {
        let link = decode_str("not a url");
        assert!(link.is_total_failure());
    }

    #[test]
    fn url_without_host_yields_no_action() {
        let link = decode(&Url::parse("brewup:drink").unwrap());
        assert!(link.action.is_none());
        assert!(link.data.is_none());
    }

    #[test]
    fn share_link_carries_the_drink_record() {
        let drink = Drink::create(CreateDrink {
            name: "Flat White".to_string(),
            ingredients: vec!["Espresso".to_string(), "Microfoam".to_string()],
            ..CreateDrink::default()
        });
        let link = decode(&share_link(&drink).unwrap());
        let record = link.drink_record().unwrap();
        assert_eq!(record["name"], json!("Flat White"));
        assert_eq!(record["ingredients"], json!("Espresso|Microfoam|"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn primitive() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                any::<f64>()
                    .prop_filter("JSON has no NaN or infinity", |f| f.is_finite())
                    .prop_map(Value::from),
                any::<String>().prop_map(Value::from),
                prop::collection::vec(any::<String>(), 0..4).prop_map(Value::from),
            ]
        }

        fn any_record() -> impl Strategy<Value = DrinkRecord> {
            prop::collection::vec((any::<String>(), primitive()), 0..10)
                .prop_map(|pairs| pairs.into_iter().collect::<DrinkRecord>())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: any record of JSON primitives survives a drink link unchanged.
            #[test]
            fn drink_link_round_trips_any_record(r in any_record()) {
                let url = encode(DRINK_ACTION, &r).unwrap();
                let link = decode(&url);
                prop_assert_eq!(link.action.as_deref(), Some(DRINK_ACTION));
                prop_assert_eq!(link.data, Some(r));
            }

            /// Property: floats come back bit-for-bit.
            #[test]
            fn floats_round_trip_exactly(bits in any::<u64>()) {
                let f = f64::from_bits(bits);
                prop_assume!(f.is_finite());
                let mut r = DrinkRecord::new();
                r.insert("rating".to_string(), Value::from(f));

                let back = decode(&encode(DRINK_ACTION, &r).unwrap()).data.unwrap();
                let decoded = back["rating"].as_f64().unwrap();
                prop_assert!(decoded == f, "{f:e} came back as {decoded:e}");
            }
        }
    }
}
