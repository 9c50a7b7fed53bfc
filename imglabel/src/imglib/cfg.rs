use crate::{
    color::Color,
    display_mode::DisplayMode,
    file_util::{self, DEFAULT_HOMEDIR},
    result::warn_or,
};
use imglabel_domain::{lblerr, to_lbl, LblResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CFG_FILENAME: &str = "imglabel_cfg.toml";

const CFG_DEFAULT: &str = r##"
    box_color = "#ff0000"  # stroke of new boxes
    point_color = "#0000ff"  # fill and stroke of new points
    # darkmode = true  # overrides the system preference if set
    "##;

fn default_box_color() -> String {
    "#ff0000".to_string()
}
fn default_point_color() -> String {
    "#0000ff".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Cfg {
    pub darkmode: Option<bool>,
    #[serde(default = "default_box_color")]
    pub box_color: String,
    #[serde(default = "default_point_color")]
    pub point_color: String,
    pub home_folder: Option<String>,
}
impl Default for Cfg {
    fn default() -> Self {
        toml::from_str(CFG_DEFAULT).expect("default config broken")
    }
}

impl Cfg {
    pub fn read(homefolder: &Path) -> LblResult<Self> {
        let cfg_toml_path = get_cfg_path(homefolder);
        if cfg_toml_path.exists() {
            let toml_str = file_util::read_to_string(&cfg_toml_path)?;
            toml::from_str(&toml_str).map_err(|e| lblerr!("could not parse cfg due to {:?}", e))
        } else {
            info!("no cfg file found at {cfg_toml_path:?}. using default cfg");
            Ok(Self::default())
        }
    }
    pub fn write(&self) -> LblResult<()> {
        let cfg_path = get_cfg_path(&self.home_folder());
        let cfg_str = toml::to_string_pretty(self).map_err(to_lbl)?;
        file_util::write(&cfg_path, cfg_str)?;
        info!("wrote cfg to {cfg_path:?}");
        Ok(())
    }
    pub fn home_folder(&self) -> PathBuf {
        match &self.home_folder {
            Some(hf) => PathBuf::from(hf),
            None => DEFAULT_HOMEDIR.clone(),
        }
    }
    pub fn log_folder(&self) -> PathBuf {
        self.home_folder().join("logs")
    }
    /// Preference forced by the user, `None` if the system decides
    pub fn forced_display_mode(&self) -> Option<DisplayMode> {
        self.darkmode.map(DisplayMode::from_is_dark)
    }
    pub fn box_color(&self) -> Color {
        warn_or(self.box_color.parse(), Color::DEFAULT_BOX)
    }
    pub fn point_color(&self) -> Color {
        warn_or(self.point_color.parse(), Color::DEFAULT_POINT)
    }
}

pub fn get_cfg_path(homefolder: &Path) -> PathBuf {
    homefolder.join(CFG_FILENAME)
}

#[cfg(test)]
use crate::{defer_folder_removal, file_util::DEFAULT_TMPDIR};

#[test]
fn test_default_cfg() {
    let cfg = Cfg::default();
    assert_eq!(cfg.darkmode, None);
    assert_eq!(cfg.box_color(), Color::DEFAULT_BOX);
    assert_eq!(cfg.point_color(), Color::DEFAULT_POINT);
    assert_eq!(cfg.forced_display_mode(), None);
}

#[test]
fn test_write_read_cfg() {
    let home = DEFAULT_TMPDIR.join("test_write_read_cfg");
    defer_folder_removal!(&home);
    let cfg = Cfg {
        darkmode: Some(true),
        box_color: "rgb(0, 255, 0)".to_string(),
        point_color: "nocolor".to_string(),
        home_folder: Some(home.to_str().unwrap().to_string()),
    };
    cfg.write().unwrap();
    let read = Cfg::read(&home).unwrap();
    assert_eq!(read, cfg);
    assert_eq!(read.forced_display_mode(), Some(DisplayMode::Dark));
    assert_eq!(read.box_color(), Color::rgb(0, 255, 0));
    // invalid colors fall back to the defaults
    assert_eq!(read.point_color(), Color::DEFAULT_POINT);
    assert_eq!(read.log_folder(), home.join("logs"));
}

#[test]
fn test_read_missing_and_partial() {
    let home = DEFAULT_TMPDIR.join("test_read_missing_and_partial");
    defer_folder_removal!(&home);
    assert_eq!(Cfg::read(&home).unwrap(), Cfg::default());
    file_util::write(get_cfg_path(&home), "darkmode = false").unwrap();
    let cfg = Cfg::read(&home).unwrap();
    assert_eq!(cfg.darkmode, Some(false));
    assert_eq!(cfg.box_color, default_box_color());
    file_util::write(get_cfg_path(&home), "darkmode = 3").unwrap();
    assert!(Cfg::read(&home).is_err());
}
