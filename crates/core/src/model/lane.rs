use serde::{Deserialize, Serialize};

/// A horizontal band holding every item of one series name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub name: String,
    /// Top edge in pixels, relative to the content group.
    pub y_offset: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Lane {
    pub fn bottom(&self) -> u32 {
        self.y_offset + self.height
    }
}

/// Ordinal band layout over a fixed pixel height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lanes {
    lanes: Vec<Lane>,
}

impl Lanes {
    /// Assign one equal-height band per distinct name, in order of first
    /// appearance.
    ///
    /// Every band is `floor(height / count)` pixels tall except the last,
    /// which absorbs the remainder so the bands tile `[0, height]` exactly.
    pub fn assign<'a>(names: impl IntoIterator<Item = &'a str>, height: u32) -> Self {
        let mut distinct: Vec<&str> = Vec::new();
        for name in names {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }
        if distinct.is_empty() {
            return Self::default();
        }

        let count = distinct.len() as u32;
        let step = height / count;
        let lanes = distinct
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let i = i as u32;
                let y_offset = step * i;
                let height = if i + 1 == count { height - y_offset } else { step };
                Lane {
                    name: name.to_string(),
                    y_offset,
                    height,
                }
            })
            .collect();
        Self { lanes }
    }

    pub fn get(&self, name: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.name == name)
    }

    /// Index and lane for `name`.
    pub fn find(&self, name: &str) -> Option<(usize, &Lane)> {
        self.lanes
            .iter()
            .enumerate()
            .find(|(_, lane)| lane.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lane> {
        self.lanes.iter()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Lanes {
    type Item = &'a Lane;
    type IntoIter = std::slice::Iter<'a, Lane>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
