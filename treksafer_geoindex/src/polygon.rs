use geo::{LineString, MultiPolygon, Polygon};
use shapefile::{PolygonRing, Shape};
use treksafer_common::coord::web_mercator_forward;

/// Project a shapefile polygon shape (lon/lat degrees) into a `geo::MultiPolygon`
/// in EPSG:3857 meters, the planar space every distance query in this crate
/// runs in. Multi-part polygons and holes follow the shapefile ring order:
/// each `Outer` ring starts a new part; subsequent `Inner` rings are its holes
/// until the next `Outer` ring begins.
pub fn shape_to_multi_polygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(p) => rings_to_multi_polygon(p.rings(), |pt: &shapefile::Point| (pt.x, pt.y)),
        Shape::PolygonM(p) => rings_to_multi_polygon(p.rings(), |pt: &shapefile::PointM| (pt.x, pt.y)),
        Shape::PolygonZ(p) => rings_to_multi_polygon(p.rings(), |pt: &shapefile::PointZ| (pt.x, pt.y)),
        _ => None,
    }
}

fn rings_to_multi_polygon<P>(
    rings: &[PolygonRing<P>],
    xy: impl Fn(&P) -> (f64, f64),
) -> Option<MultiPolygon<f64>> {
    let mut parts: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => {
                parts.push((project_ring(points, &xy), Vec::new()));
            }
            PolygonRing::Inner(points) => {
                if let Some((_, holes)) = parts.last_mut() {
                    holes.push(project_ring(points, &xy));
                }
                // An Inner ring with no preceding Outer ring is malformed
                // input; silently dropping it is the degraded-but-defined
                // behavior this crate promises for bad shapefile data.
            }
        }
    }

    if parts.is_empty() {
        return None;
    }

    Some(MultiPolygon::new(
        parts
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    ))
}

fn project_ring<P>(points: &[P], xy: impl Fn(&P) -> (f64, f64)) -> LineString<f64> {
    LineString::from(
        points
            .iter()
            .map(|p| {
                let (x, y) = xy(p);
                web_mercator_forward(x, y)
            })
            .collect::<Vec<(f64, f64)>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::Point as ShpPoint;

    #[test]
    fn single_ring_square_projects_to_one_part() {
        let square = vec![
            ShpPoint::new(0.0, 0.0),
            ShpPoint::new(0.0, 1.0),
            ShpPoint::new(1.0, 1.0),
            ShpPoint::new(1.0, 0.0),
            ShpPoint::new(0.0, 0.0),
        ];
        let shape = Shape::Polygon(shapefile::Polygon::new(PolygonRing::Outer(square)));
        let multi = shape_to_multi_polygon(&shape).unwrap();
        assert_eq!(multi.0.len(), 1);
        assert!(multi.0[0].interiors().is_empty());
    }
}
