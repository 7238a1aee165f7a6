use url::Url;

const MODRINTH_HOSTS: [&str; 2] = ["modrinth.com", "www.modrinth.com"];
const MOD_TAG: &str = "mod";

/// Extracts the Modrinth project id (or slug) from a mod page URL.
///
/// Accepts URLs like:
///   https://modrinth.com/mod/zV5r3pPn
///   https://modrinth.com/mod/zV5r3pPn/version/1.0.0
///
/// Returns `None` for anything that doesn't parse or isn't a Modrinth mod page.
pub fn project_id_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = Url::parse(url).ok()?;

    let host = parsed.host_str()?.to_ascii_lowercase();
    if !MODRINTH_HOSTS.contains(&host.as_str()) {
        return None;
    }

    // Url normalizes the path (dot segments, backslashes, percent-encoding),
    // so segments come from the input as written.
    let (authority, path) = raw_authority_and_path(url)?;
    if !is_modrinth_authority(authority) {
        return None;
    }

    let mut parts = path.split('/').filter(|p| !p.is_empty());
    match (parts.next(), parts.next()) {
        (Some(tag), Some(id)) if tag.eq_ignore_ascii_case(MOD_TAG) => Some(id.to_owned()),
        _ => None,
    }
}

/// Splits `scheme://authority/path?query#fragment` into authority and path.
fn raw_authority_and_path(url: &str) -> Option<(&str, &str)> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(end);
    let path = tail.split(['?', '#']).next().unwrap_or("");
    Some((authority, path))
}

fn is_modrinth_authority(authority: &str) -> bool {
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = host_port.split(':').next().unwrap_or(host_port);
    MODRINTH_HOSTS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mod_url() {
        assert_eq!(
            project_id_from_url("https://modrinth.com/mod/P7dR8mSH"),
            Some("P7dR8mSH".to_string())
        );
    }

    #[test]
    fn version_suffix_is_ignored() {
        assert_eq!(
            project_id_from_url("https://modrinth.com/mod/zV5r3pPn/version/1.0.0"),
            Some("zV5r3pPn".to_string())
        );
    }

    #[test]
    fn www_and_mixed_case_host_and_tag() {
        assert_eq!(
            project_id_from_url("https://WWW.Modrinth.com/MOD/sodium"),
            Some("sodium".to_string())
        );
    }

    #[test]
    fn id_is_returned_verbatim() {
        assert_eq!(
            project_id_from_url("https://modrinth.com/mod/FabricAPI"),
            Some("FabricAPI".to_string())
        );
    }

    #[test]
    fn dot_segments_are_not_resolved() {
        assert_eq!(project_id_from_url("https://modrinth.com/shader/../mod/abc"), None);
        assert_eq!(
            project_id_from_url("https://modrinth.com/mod/./abc"),
            Some(".".to_string())
        );
    }

    #[test]
    fn backslashes_are_not_path_separators() {
        assert_eq!(project_id_from_url("https://modrinth.com\\mod\\abc"), None);
    }

    #[test]
    fn id_characters_are_not_percent_encoded() {
        assert_eq!(
            project_id_from_url("https://modrinth.com/mod/café"),
            Some("café".to_string())
        );
        assert_eq!(
            project_id_from_url("https://modrinth.com/mod/a`b"),
            Some("a`b".to_string())
        );
    }

    #[test]
    fn query_fragment_and_port_are_ignored() {
        assert_eq!(
            project_id_from_url("https://modrinth.com:443/mod/sodium?tab=versions#top"),
            Some("sodium".to_string())
        );
        assert_eq!(project_id_from_url("https://modrinth.com?mod/abc"), None);
    }

    #[test]
    fn other_hosts_are_rejected() {
        assert_eq!(
            project_id_from_url("https://www.curseforge.com/minecraft/mc-mods/jei"),
            None
        );
        assert_eq!(project_id_from_url("https://modrinth.com.evil.org/mod/x"), None);
        assert_eq!(project_id_from_url("https://api.modrinth.com/mod/x"), None);
    }

    #[test]
    fn other_resource_kinds_are_rejected() {
        assert_eq!(project_id_from_url("https://modrinth.com/shader/x"), None);
        assert_eq!(project_id_from_url("https://modrinth.com/mod"), None);
        assert_eq!(project_id_from_url("https://modrinth.com/mod/"), None);
        assert_eq!(project_id_from_url("https://modrinth.com/"), None);
    }

    #[test]
    fn garbage_never_panics() {
        for input in [
            "",
            "   ",
            "not a url",
            "modrinth.com/mod/abc",
            "://",
            "https://",
            "https://ドメイン.example/mod/x",
            "https://модринт.com/mod/x",
            "mailto:someone@modrinth.com",
        ] {
            assert_eq!(project_id_from_url(input), None, "input: {input:?}");
        }
    }
}
