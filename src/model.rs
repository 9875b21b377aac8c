//! User records as delivered by the remote directory.
//!
//! Only `id` is required. Every other field is either defaulted to an empty
//! string (missing key or `null`) or modelled as an `Option`, so a partial
//! payload still renders (blank fields) instead of failing the whole page.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Default host used for map links.
pub const DEFAULT_MAP_HOST: &str = "www.google.com";

/// One user as returned by `GET /users`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company: Option<Company>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suite: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zipcode: String,
    #[serde(default)]
    pub geo: Option<Geo>,
}

/// Geo-coordinates, kept as the numeric strings the source sends.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lng: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "catchPhrase", deserialize_with = "null_as_default")]
    pub catch_phrase: String,
    /// Short slogan shown as the company "bio".
    #[serde(default, deserialize_with = "null_as_default")]
    pub bs: String,
}

impl Geo {
    /// Both coordinates, trimmed, or `None` if either is blank.
    pub fn coordinates(&self) -> Option<(&str, &str)> {
        let lat = self.lat.trim();
        let lng = self.lng.trim();
        if lat.is_empty() || lng.is_empty() {
            return None;
        }
        Some((lat, lng))
    }
}

impl UserRecord {
    /// Map-service URL for the user's coordinates, if the record carries them.
    pub fn map_link(&self, map_host: &str) -> Option<String> {
        let geo = self.address.as_ref()?.geo.as_ref()?;
        let (lat, lng) = geo.coordinates()?;
        Some(format!("https://{map_host}/maps?q={lat},{lng}"))
    }

    /// `https://` link to the user's website, if one is set.
    pub fn website_link(&self) -> Option<String> {
        let site = self.website.trim();
        if site.is_empty() {
            return None;
        }
        Some(format!("https://{site}"))
    }

    /// Single-line postal address; blank when no address was delivered.
    pub fn address_line(&self) -> String {
        match &self.address {
            Some(a) => format!("{}, {}, {}", a.street, a.city, a.zipcode),
            None => String::new(),
        }
    }

    pub fn company_name(&self) -> &str {
        self.company.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn company_bio(&self) -> &str {
        self.company.as_ref().map(|c| c.bs.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }"#;

    #[test]
    fn decodes_full_record_and_derives_links() {
        let u: UserRecord = serde_json::from_str(FULL).unwrap();
        assert_eq!(u.id, 1);
        assert_eq!(u.company_bio(), "harness real-time e-markets");
        assert_eq!(
            u.company.as_ref().unwrap().catch_phrase,
            "Multi-layered client-server neural-net"
        );
        assert_eq!(
            u.map_link(DEFAULT_MAP_HOST).as_deref(),
            Some("https://www.google.com/maps?q=-37.3159,81.1496")
        );
        assert_eq!(u.website_link().as_deref(), Some("https://hildegard.org"));
        assert_eq!(u.address_line(), "Kulas Light, Gwenborough, 92998-3874");
    }

    #[test]
    fn partial_record_degrades_to_blank_fields() {
        let u: UserRecord = serde_json::from_str(r#"{"id": 7, "name": "Only Name"}"#).unwrap();
        assert_eq!(u.email, "");
        assert_eq!(u.address_line(), "");
        assert_eq!(u.company_name(), "");
        assert!(u.map_link(DEFAULT_MAP_HOST).is_none());
        assert!(u.website_link().is_none());
    }

    #[test]
    fn null_fields_do_not_sink_the_page() {
        let page: Vec<UserRecord> = serde_json::from_str(
            r#"[{"id": 1, "name": "A", "website": null, "address": {"city": null, "geo": null}},
                {"id": 2, "name": "B", "company": {"name": null, "catchPhrase": null, "bs": "b2b"}}]"#,
        )
        .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].website, "");
        assert!(page[0].website_link().is_none());
        assert!(page[0].map_link(DEFAULT_MAP_HOST).is_none());
        assert_eq!(page[1].company_name(), "");
        assert_eq!(page[1].company_bio(), "b2b");
    }

    #[test]
    fn blank_coordinates_do_not_produce_a_link() {
        let u = UserRecord {
            id: 2,
            address: Some(Address {
                geo: Some(Geo { lat: " ".into(), lng: "10.0".into() }),
                ..Address::default()
            }),
            ..UserRecord::default()
        };
        assert!(u.map_link(DEFAULT_MAP_HOST).is_none());
    }
}
