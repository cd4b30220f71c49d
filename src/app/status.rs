use gossip::Config;
use gossip::prefs::Preferences;

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub fn render_status(config: &Config, prefs: &Preferences) -> String {
    let lines = [
        format!("◆ gossip {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        format!("  config       {}", config.config_path.display()),
        format!("  logs         {}", config.logs_path().display()),
        format!("  preferences  {}", config.preferences_path().display()),
        format!("  nick         {}", config.nick.as_deref().unwrap_or("(unset)")),
        format!("  on_corrupt   {}", config.on_corrupt),
        String::new(),
        format!("  mentions     {}", on_off(prefs.mentions_enabled)),
        format!("  pms          {}", on_off(prefs.pms_enabled)),
        format!("  pending      {}", prefs.pending.summary()),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_shows_toggles_and_pending() {
        let mut prefs = Preferences {
            pms_enabled: false,
            ..Preferences::default()
        };
        prefs.pending.insert("#rust");

        let rendered = render_status(&Config::default(), &prefs);
        assert!(rendered.contains("mentions     on"));
        assert!(rendered.contains("pms          off"));
        assert!(rendered.contains("unread mentions in: #rust"));
        assert!(rendered.contains("on_corrupt   abort"));
    }
}
