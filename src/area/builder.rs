use super::*;
use std::fmt::{Display, Formatter};

#[derive(Debug, Error)]
#[must_use]
pub struct BuilderError(pub Box<Builder>, pub String);

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "area builder error: {}", self.1)?;
        writeln!(f, "builder: {:?}", self.0)
    }
}

/// Builds an `Area` from text, one string per row of cells
///
/// Terrain rows use `.` for floor, `#` for walls, `+` for a closed door,
/// `'` for an open door and `?` for unexplored floor. Elevation rows use
/// one digit per cell.
#[derive(Default, Clone, Debug)]
pub struct Builder {
    pub terrain: Option<Vec<String>>,
    pub elevation: Option<Vec<String>>,
}

impl Builder {
    #[inline(always)]
    #[must_use]
    pub fn terrain<S: AsRef<str>>(mut self, rows: &[S]) -> Self {
        self.terrain = Some(rows.iter().map(|row| row.as_ref().to_owned()).collect());
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn elevation<S: AsRef<str>>(mut self, rows: &[S]) -> Self {
        self.elevation = Some(rows.iter().map(|row| row.as_ref().to_owned()).collect());
        self
    }

    fn error<S: ToString>(&self, msg: S) -> BuilderError {
        BuilderError(Box::new(self.clone()), msg.to_string())
    }

    fn dim_of(&self, rows: &[String], what: &str) -> Result<HexDim, BuilderError> {
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(self.error(format!("{} is empty", what)));
        }
        if let Some(v) = rows.iter().position(|row| row.chars().count() != width) {
            return Err(self.error(format!(
                "{} row {} has {} cells, expected {}",
                what,
                v,
                rows[v].chars().count(),
                width
            )));
        }
        Ok(HexDim::new(width as isize, rows.len() as isize))
    }

    fn cells<'a>(rows: &'a [String]) -> impl Iterator<Item = (HexPoint, char)> + 'a {
        rows.iter().enumerate().flat_map(|(v, row)| {
            row.chars()
                .enumerate()
                .map(move |(h, c)| (HexPoint::new(h as isize, v as isize), c))
        })
    }

    pub fn build(&self) -> Result<Area, BuilderError> {
        let terrain = self
            .terrain
            .as_ref()
            .ok_or_else(|| self.error("missing field `terrain`"))?;
        let dim = self.dim_of(terrain, "terrain")?;

        let mut area = Area::open(dim);
        for (pos, c) in Self::cells(terrain) {
            match c {
                '.' => {}
                '#' => area.set_passable(pos, false),
                '+' => area.add_door(pos, false),
                '\'' => area.add_door(pos, true),
                '?' => area.set_explored(pos, false),
                other => {
                    return Err(self.error(format!("unknown terrain {:?} at {:?}", other, pos)))
                }
            }
        }

        if let Some(elevation) = &self.elevation {
            let elevation_dim = self.dim_of(elevation, "elevation")?;
            if elevation_dim != dim {
                return Err(self.error(format!(
                    "elevation is {:?} but terrain is {:?}",
                    elevation_dim, dim
                )));
            }
            for (pos, c) in Self::cells(elevation) {
                let band = c.to_digit(10).ok_or_else(|| {
                    self.error(format!("elevation {:?} at {:?} is not a digit", c, pos))
                })?;
                area.set_elevation(pos, band as Elevation);
            }
        }

        Ok(area)
    }
}

#[test]
fn test_terrain_symbols() {
    let area = Builder::default()
        .terrain(&[".#+", "'?."])
        .elevation(&["001", "000"])
        .build()
        .unwrap();

    assert_eq!(area.dim(), HexDim::new(3, 2));
    assert!(area.is_passable(HexPoint::new(0, 0)));
    assert!(!area.is_passable(HexPoint::new(1, 0)));
    assert!(!area.current_passable()[HexPoint::new(2, 0)]);
    assert!(area.current_passable()[HexPoint::new(0, 1)]);
    assert!(!area.is_explored(HexPoint::new(1, 1)));
    assert_eq!(area.elevation_at(HexPoint::new(2, 0)), 1);
}

#[test]
fn test_malformed_rows() {
    let err = Builder::default().terrain(&["...", ".."]).build().unwrap_err();
    assert!(err.1.contains("row 1"));

    let err = Builder::default()
        .terrain(&["..", ".."])
        .elevation(&["0"])
        .build()
        .unwrap_err();
    assert!(err.1.contains("elevation"));

    let err = Builder::default().terrain(&[".x"]).build().unwrap_err();
    assert!(err.1.contains("unknown terrain"));

    assert!(Builder::default().build().is_err());
}
