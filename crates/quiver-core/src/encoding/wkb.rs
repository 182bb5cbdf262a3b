//! Well-known binary for GEO values.
//!
//! Writes ISO WKB in little-endian byte order. Reads either byte order, 2D
//! geometries only. `Line`, `Rect` and `Triangle` have no WKB code of their own
//! and are written as `LineString` / `Polygon`.

use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};

use crate::{CoreError, CoreResult};

const POINT: u32 = 1;
const LINE_STRING: u32 = 2;
const POLYGON: u32 = 3;
const MULTI_POINT: u32 = 4;
const MULTI_LINE_STRING: u32 = 5;
const MULTI_POLYGON: u32 = 6;
const GEOMETRY_COLLECTION: u32 = 7;

/// Nesting limit for geometry collections.
const MAX_DEPTH: usize = 32;

const COORD_BYTES: usize = 16;

/// Append the WKB form of `geometry` to `buf`.
pub fn write_geometry(geometry: &Geometry<f64>, buf: &mut Vec<u8>) {
    match geometry {
        Geometry::Point(p) => write_point(p, buf),
        Geometry::Line(l) => {
            header(LINE_STRING, buf);
            count(2, buf);
            coord(l.start, buf);
            coord(l.end, buf);
        }
        Geometry::LineString(ls) => {
            header(LINE_STRING, buf);
            ring(ls, buf);
        }
        Geometry::Polygon(p) => write_polygon(p, buf),
        Geometry::MultiPoint(mp) => {
            header(MULTI_POINT, buf);
            count(mp.0.len(), buf);
            for p in &mp.0 {
                write_point(p, buf);
            }
        }
        Geometry::MultiLineString(mls) => {
            header(MULTI_LINE_STRING, buf);
            count(mls.0.len(), buf);
            for ls in &mls.0 {
                header(LINE_STRING, buf);
                ring(ls, buf);
            }
        }
        Geometry::MultiPolygon(mp) => {
            header(MULTI_POLYGON, buf);
            count(mp.0.len(), buf);
            for p in &mp.0 {
                write_polygon(p, buf);
            }
        }
        Geometry::GeometryCollection(gc) => {
            header(GEOMETRY_COLLECTION, buf);
            count(gc.0.len(), buf);
            for g in &gc.0 {
                write_geometry(g, buf);
            }
        }
        Geometry::Rect(r) => write_polygon(&r.to_polygon(), buf),
        Geometry::Triangle(t) => write_polygon(&t.to_polygon(), buf),
    }
}

fn header(code: u32, buf: &mut Vec<u8>) {
    buf.push(1);
    buf.extend_from_slice(&code.to_le_bytes());
}

fn count(n: usize, buf: &mut Vec<u8>) {
    let n = u32::try_from(n).unwrap_or(u32::MAX);
    buf.extend_from_slice(&n.to_le_bytes());
}

fn coord(c: Coord<f64>, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&c.x.to_le_bytes());
    buf.extend_from_slice(&c.y.to_le_bytes());
}

fn ring(ls: &LineString<f64>, buf: &mut Vec<u8>) {
    count(ls.0.len(), buf);
    for c in &ls.0 {
        coord(*c, buf);
    }
}

fn write_point(p: &Point<f64>, buf: &mut Vec<u8>) {
    header(POINT, buf);
    coord(p.0, buf);
}

fn write_polygon(p: &Polygon<f64>, buf: &mut Vec<u8>) {
    header(POLYGON, buf);
    count(1 + p.interiors().len(), buf);
    ring(p.exterior(), buf);
    for interior in p.interiors() {
        ring(interior, buf);
    }
}

/// Parse one WKB geometry occupying all of `bytes`.
///
/// # Errors
///
/// Returns [`CoreError::CorruptValue`] on truncation, trailing bytes, an
/// unknown byte order or an unsupported geometry code.
pub fn read_geometry(bytes: &[u8]) -> CoreResult<Geometry<f64>> {
    let mut reader = Reader { bytes, pos: 0, little: true };
    let geometry = reader.geometry(0)?;
    if reader.pos != bytes.len() {
        return Err(corrupt(format!("{} trailing bytes", bytes.len() - reader.pos)));
    }
    Ok(geometry)
}

fn corrupt(reason: impl Into<String>) -> CoreError {
    CoreError::corrupt("geo", reason)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    little: bool,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> CoreResult<[u8; N]> {
        let end = self.pos.checked_add(N).filter(|end| *end <= self.bytes.len());
        let Some(end) = end else {
            return Err(corrupt(format!("truncated at byte {}", self.pos)));
        };
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(out)
    }

    fn u32(&mut self) -> CoreResult<u32> {
        let raw = self.take::<4>()?;
        Ok(if self.little { u32::from_le_bytes(raw) } else { u32::from_be_bytes(raw) })
    }

    fn f64(&mut self) -> CoreResult<f64> {
        let raw = self.take::<8>()?;
        Ok(if self.little { f64::from_le_bytes(raw) } else { f64::from_be_bytes(raw) })
    }

    /// A count of items each at least `min_size` bytes, checked against what is left.
    fn count(&mut self, min_size: usize) -> CoreResult<usize> {
        let n = usize::try_from(self.u32()?).map_err(|_| corrupt("count overflows"))?;
        let remaining = self.bytes.len() - self.pos;
        if n.checked_mul(min_size).map_or(true, |need| need > remaining) {
            return Err(corrupt(format!("count {n} exceeds remaining {remaining} bytes")));
        }
        Ok(n)
    }

    fn coord(&mut self) -> CoreResult<Coord<f64>> {
        Ok(Coord { x: self.f64()?, y: self.f64()? })
    }

    fn line_string(&mut self) -> CoreResult<LineString<f64>> {
        let n = self.count(COORD_BYTES)?;
        (0..n).map(|_| self.coord()).collect::<CoreResult<Vec<_>>>().map(LineString::new)
    }

    fn polygon(&mut self) -> CoreResult<Polygon<f64>> {
        let rings = self.count(4)?;
        if rings == 0 {
            return Ok(Polygon::new(LineString::new(Vec::new()), Vec::new()));
        }
        let exterior = self.line_string()?;
        let interiors = (1..rings).map(|_| self.line_string()).collect::<CoreResult<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    fn header(&mut self, expected: Option<u32>) -> CoreResult<u32> {
        let [order] = self.take::<1>()?;
        self.little = match order {
            0 => false,
            1 => true,
            other => return Err(corrupt(format!("unknown byte order {other}"))),
        };
        let code = self.u32()?;
        if let Some(expected) = expected {
            if code != expected {
                return Err(corrupt(format!("expected geometry code {expected}, found {code}")));
            }
        }
        Ok(code)
    }

    fn geometry(&mut self, depth: usize) -> CoreResult<Geometry<f64>> {
        if depth > MAX_DEPTH {
            return Err(corrupt("geometry nesting too deep"));
        }
        let code = self.header(None)?;
        Ok(match code {
            POINT => Geometry::Point(Point(self.coord()?)),
            LINE_STRING => Geometry::LineString(self.line_string()?),
            POLYGON => Geometry::Polygon(self.polygon()?),
            MULTI_POINT => {
                let n = self.count(5 + COORD_BYTES)?;
                let points = (0..n)
                    .map(|_| {
                        self.header(Some(POINT))?;
                        self.coord().map(Point)
                    })
                    .collect::<CoreResult<Vec<_>>>()?;
                Geometry::MultiPoint(MultiPoint(points))
            }
            MULTI_LINE_STRING => {
                let n = self.count(9)?;
                let lines = (0..n)
                    .map(|_| {
                        self.header(Some(LINE_STRING))?;
                        self.line_string()
                    })
                    .collect::<CoreResult<Vec<_>>>()?;
                Geometry::MultiLineString(MultiLineString(lines))
            }
            MULTI_POLYGON => {
                let n = self.count(9)?;
                let polygons = (0..n)
                    .map(|_| {
                        self.header(Some(POLYGON))?;
                        self.polygon()
                    })
                    .collect::<CoreResult<Vec<_>>>()?;
                Geometry::MultiPolygon(MultiPolygon(polygons))
            }
            GEOMETRY_COLLECTION => {
                let n = self.count(5)?;
                let items =
                    (0..n).map(|_| self.geometry(depth + 1)).collect::<CoreResult<Vec<_>>>()?;
                Geometry::GeometryCollection(GeometryCollection(items))
            }
            other => return Err(corrupt(format!("unsupported geometry code {other}"))),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo_types::{line_string, point, polygon, Line, Rect};

    use super::*;

    fn roundtrip(g: Geometry<f64>) -> Geometry<f64> {
        let mut buf = Vec::new();
        write_geometry(&g, &mut buf);
        read_geometry(&buf).unwrap()
    }

    #[test]
    fn point_layout() {
        let mut buf = Vec::new();
        write_geometry(&Geometry::Point(point!(x: 1.0, y: 2.0)), &mut buf);
        let mut expected = vec![1, 1, 0, 0, 0];
        expected.extend_from_slice(&1.0f64.to_le_bytes());
        expected.extend_from_slice(&2.0f64.to_le_bytes());
        assert_eq!(buf, expected);
    }

    #[test]
    fn reads_big_endian() {
        let mut buf = vec![0, 0, 0, 0, 1];
        buf.extend_from_slice(&1.0f64.to_be_bytes());
        buf.extend_from_slice(&2.0f64.to_be_bytes());
        assert_eq!(read_geometry(&buf).unwrap(), Geometry::Point(point!(x: 1.0, y: 2.0)));
    }

    #[test]
    fn shapes_roundtrip() {
        let ls: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        assert_eq!(roundtrip(ls.clone()), ls);

        let poly: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 0.0)
        ]
        .into();
        assert_eq!(roundtrip(poly.clone()), poly);

        let gc = Geometry::GeometryCollection(GeometryCollection(vec![ls, poly]));
        assert_eq!(roundtrip(gc.clone()), gc);
    }

    #[test]
    fn line_and_rect_are_widened() {
        let line = Geometry::Line(Line::new((0.0, 0.0), (1.0, 1.0)));
        assert!(matches!(roundtrip(line), Geometry::LineString(ls) if ls.0.len() == 2));

        let rect = Geometry::Rect(Rect::new((0.0, 0.0), (1.0, 1.0)));
        assert!(matches!(roundtrip(rect), Geometry::Polygon(_)));
    }

    #[test]
    fn malformed_input_is_corrupt() {
        assert!(read_geometry(&[]).unwrap_err().is_corrupt());
        assert!(read_geometry(&[2, 1, 0, 0, 0]).unwrap_err().is_corrupt());
        assert!(read_geometry(&[1, 99, 0, 0, 0]).unwrap_err().is_corrupt());
        // Point Z is not supported
        assert!(read_geometry(&[1, 0xE9, 0x03, 0, 0]).unwrap_err().is_corrupt());
        // a line string claiming a billion points
        assert!(read_geometry(&[1, 2, 0, 0, 0, 0, 0xCA, 0x9A, 0x3B]).unwrap_err().is_corrupt());

        let mut buf = Vec::new();
        write_geometry(&Geometry::Point(point!(x: 1.0, y: 2.0)), &mut buf);
        buf.push(0);
        assert!(read_geometry(&buf).unwrap_err().is_corrupt());
    }
}
