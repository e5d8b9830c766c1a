//! Target dimension enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseTargetError {
  pub kind: &'static str,
  pub value: String,
  pub expected: String,
}

fn parse_kind<T: Copy>(kind: &'static str, value: &str, all: &[T], name: fn(&T) -> &'static str) -> Result<T, ParseTargetError> {
  all
    .iter()
    .find(|candidate| name(candidate).eq_ignore_ascii_case(value.trim()))
    .copied()
    .ok_or_else(|| ParseTargetError {
      kind,
      value: value.to_string(),
      expected: all.iter().map(name).collect::<Vec<_>>().join(", "),
    })
}

/// Hardware platform a project is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
  #[serde(rename = "win32")]
  Win32,
  #[serde(rename = "win64")]
  Win64,
  #[serde(rename = "linux64")]
  Linux64,
  #[serde(rename = "macos-arm64")]
  MacOsArm64,
}

impl Platform {
  pub const ALL: &'static [Self] = &[Self::Win32, Self::Win64, Self::Linux64, Self::MacOsArm64];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Win32 => "win32",
      Self::Win64 => "win64",
      Self::Linux64 => "linux64",
      Self::MacOsArm64 => "macos-arm64",
    }
  }

  pub fn os(&self) -> Os {
    match self {
      Self::Win32 | Self::Win64 => Os::Windows,
      Self::Linux64 => Os::Linux,
      Self::MacOsArm64 => Os::MacOs,
    }
  }
}

/// Operating system variants implied by a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Windows,
  Linux,
  MacOs,
}

impl Os {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "windows",
      Self::Linux => "linux",
      Self::MacOs => "macos",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimization {
  Debug,
  Release,
}

impl Optimization {
  pub const ALL: &'static [Self] = &[Self::Debug, Self::Release];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Release => "release",
    }
  }

  pub fn is_debug(&self) -> bool {
    matches!(self, Self::Debug)
  }
}

/// Compiler toolchain, including the IDE generation for Visual Studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compiler {
  #[serde(rename = "vs2019")]
  Vs2019,
  #[serde(rename = "vs2022")]
  Vs2022,
  #[serde(rename = "gcc")]
  Gcc,
  #[serde(rename = "clang")]
  Clang,
  #[serde(rename = "apple-clang")]
  AppleClang,
}

impl Compiler {
  pub const ALL: &'static [Self] = &[Self::Vs2019, Self::Vs2022, Self::Gcc, Self::Clang, Self::AppleClang];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Vs2019 => "vs2019",
      Self::Vs2022 => "vs2022",
      Self::Gcc => "gcc",
      Self::Clang => "clang",
      Self::AppleClang => "apple-clang",
    }
  }

  pub fn is_visual_studio(&self) -> bool {
    matches!(self, Self::Vs2019 | Self::Vs2022)
  }
}

/// MSVC C runtime library flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuntimeLibrary {
  #[serde(rename = "MT")]
  MultiThreaded,
  #[serde(rename = "MTd")]
  MultiThreadedDebug,
  #[serde(rename = "MD")]
  MultiThreadedDll,
  #[serde(rename = "MDd")]
  MultiThreadedDebugDll,
}

impl RuntimeLibrary {
  pub const ALL: &'static [Self] = &[
    Self::MultiThreaded,
    Self::MultiThreadedDebug,
    Self::MultiThreadedDll,
    Self::MultiThreadedDebugDll,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::MultiThreaded => "MT",
      Self::MultiThreadedDebug => "MTd",
      Self::MultiThreadedDll => "MD",
      Self::MultiThreadedDebugDll => "MDd",
    }
  }

  /// Static runtime matching the optimization level, used when none is chosen explicitly.
  pub fn default_for(optimization: Optimization) -> Self {
    if optimization.is_debug() {
      Self::MultiThreadedDebug
    } else {
      Self::MultiThreaded
    }
  }
}

macro_rules! display_and_parse {
  ($ty:ty, $kind:literal) => {
    impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
      }
    }

    impl FromStr for $ty {
      type Err = ParseTargetError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_kind($kind, s, Self::ALL, Self::as_str)
      }
    }
  };
}

display_and_parse!(Platform, "platform");
display_and_parse!(Optimization, "optimization");
display_and_parse!(Compiler, "compiler");
display_and_parse!(RuntimeLibrary, "runtime library");

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
