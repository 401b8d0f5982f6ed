//! 障害物モジュール
//!
//! 静的な凸多角形の障害物を定義します。軸並行の矩形は4頂点の特別な場合として扱います。
//! 構築時に頂点の巻き方向を反時計回りへ揃え、各辺の外向き単位法線を事前計算します。

use crate::error::{Result, SandboxError};
use crate::utils::{edge_normal, midpoint, signed_area, Vec2, EPSILON};

/// 障害物の1辺
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// 始点
    pub start: Vec2,
    /// 終点
    pub end: Vec2,
    /// 中点
    pub midpoint: Vec2,
    /// 辺方向の単位ベクトル
    pub tangent: Vec2,
    /// 外向きの単位法線
    pub normal: Vec2,
    /// 辺の長さの半分
    pub half_length: f64,
}

/// 凸多角形の障害物
///
/// 構築後は不変です。
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// 頂点（反時計回り）
    vertices: Vec<Vec2>,
    /// 辺 `i → i+1` の情報
    edges: Vec<Edge>,
    /// 描画色 (RGB, 0.0〜1.0)
    pub color: [f32; 3],
}

impl Obstacle {
    /// 頂点リストから障害物を作成
    ///
    /// 時計回りの頂点リストは反転して反時計回りにします。
    ///
    /// # 引数
    ///
    /// * `vertices` - 多角形の頂点（3つ以上）
    ///
    /// # 戻り値
    ///
    /// * 頂点が3未満、長さゼロの辺、面積ゼロ、非凸のいずれかなら`SandboxError`
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        let mut vertices = vertices;
        let n = vertices.len();
        if n < 3 {
            return Err(SandboxError::TooFewVertices(n));
        }

        for i in 0..n {
            let j = (i + 1) % n;
            if (vertices[j] - vertices[i]).length() <= EPSILON {
                return Err(SandboxError::DegenerateEdge { index: i });
            }
        }

        let area = signed_area(&vertices);
        if area.abs() <= EPSILON {
            return Err(SandboxError::ZeroArea);
        }
        if area < 0.0 {
            // 時計回りなので法線が内向きになる
            vertices.reverse();
        }

        ensure_convex(&vertices)?;

        let edges = (0..n)
            .map(|i| {
                let start = vertices[i];
                let end = vertices[(i + 1) % n];
                let length = (end - start).length();
                Edge {
                    start,
                    end,
                    midpoint: midpoint(start, end),
                    tangent: (end - start) * (1.0 / length),
                    // 長さゼロの辺は上で弾いている
                    normal: edge_normal(start, end).unwrap_or(Vec2::ZERO),
                    half_length: length / 2.0,
                }
            })
            .collect();

        Ok(Self {
            vertices,
            edges,
            color: [1.0, 1.0, 1.0],
        })
    }

    /// 軸並行の矩形障害物を作成
    ///
    /// `(x, y)`は左下の角です。
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(vec![
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ])
    }

    /// 描画色を設定
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// 頂点（反時計回り）
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// 辺の一覧
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// 反時計回りの頂点列が凸であることを確認
fn ensure_convex(vertices: &[Vec2]) -> Result<()> {
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        let ab = b - a;
        let bc = c - b;
        // 右折していれば凹
        if ab.cross(bc) < -EPSILON * ab.length() * bc.length() {
            return Err(SandboxError::NonConvex { index: (i + 1) % n });
        }
    }
    Ok(())
}
