use super::schema::Config;

pub(crate) fn config_toml(include_day_menu: bool, status_path: &str, cache_dir: &str) -> String {
    format!(
        r#"rpc_code = "112"
zone = "A"
user_agent = "cantine-test/1.0"
include_day_menu = {include_day_menu}
filename = "menu-%G-%V.pdf"
thumbname = "menu-%Y-%m-%d.png"
status_path = "{status_path}"
menus_base_url = "http://rpc01.com/menus"
fetch_timeout_secs = 30

[vacations]
url_template = "https://calendar.test/Zone-{{zone}}.ics"
cache_dir = "{cache_dir}"

[day_menu]
rasterize_command = ["gm", "convert", "{{input}}[0]", "{{output}}"]
rasterize_timeout_secs = 30

[mail]
transport = "smtp://localhost:2525"
from = "Robot Cantine <robot@example.org>"
to = ["parent@example.org"]
bcc = []
subject = "Menu semaine %V"
text = "Menu : {{URL}}"
"#
    )
}

pub(crate) fn sample_config() -> Config {
    toml::from_str(&config_toml(false, "status.json", "cache")).expect("sample config should parse")
}
